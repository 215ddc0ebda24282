use {
    clap::Parser,
    face_login::{CaptureSource, RedirectNavigator, TerminalStatus},
    facegate_camera::CameraConfig,
    facegate_flow::{CaptureFlowController, FlowError, TriggerOutcome, VerificationResult},
    facegate_verify::{EndpointConfig, HttpEndpoint},
    std::{path::PathBuf, process::ExitCode, time::Duration},
    tokio::io::{AsyncBufReadExt, BufReader},
};

// attempts to catch the first camera frame in --once mode
const READY_ATTEMPTS: u32 = 50;

// delay between those attempts
const READY_WAIT_MS: u64 = 100;

#[derive(Parser)]
#[command(name = "face-login", about = "Log in by verifying your face against a server")]
struct Cli {
    /// Verification page URL; the image is posted back to it.
    #[arg(env = "FACEGATE_URL")]
    url: String,

    /// V4L2 capture device.
    #[arg(long, default_value = "/dev/video0", env = "FACEGATE_DEVICE")]
    device: PathBuf,

    /// Use this image file instead of a camera.
    #[arg(long, env = "FACEGATE_IMAGE")]
    image: Option<PathBuf>,

    /// Requested capture width.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Requested capture height.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Anti-forgery token; read from the page when not given.
    #[arg(long, env = "FACEGATE_CSRF_TOKEN")]
    csrf_token: Option<String>,

    /// Give up on a request after this many seconds.
    #[arg(long, env = "FACEGATE_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Write logs to dated files in this directory instead of stderr.
    #[arg(long, env = "FACEGATE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Capture once right away and exit with the verdict.
    #[arg(long)]
    once: bool,
}

type Flow = CaptureFlowController<
    CaptureSource,
    HttpEndpoint,
    TerminalStatus<std::io::Stdout>,
    RedirectNavigator,
>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.log_dir {
        Some(dir) => facegate_base::init_file_logger(dir)?,
        None => facegate_base::init_console_logger(),
    }

    let camera = CameraConfig::default()
        .with_device(&cli.device)
        .with_width(cli.width)
        .with_height(cli.height);
    let source = CaptureSource::select(camera, cli.image.clone())?;

    let mut config = EndpointConfig::new(&cli.url)?;
    if let Some(token) = &cli.csrf_token {
        config = config.with_csrf_token(token.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let navigator = RedirectNavigator::new(config.page_url().clone());
    let endpoint = HttpEndpoint::new(config)?;

    log::info!("verifying against {}", cli.url);
    let flow = CaptureFlowController::new(
        source,
        endpoint,
        TerminalStatus::new(std::io::stdout()),
        navigator,
    );

    // a refused camera is reported on the status line; the user may retry
    let _ = flow.acquire_device().await;

    let verified = if cli.once {
        run_once(&flow).await
    } else {
        run_interactive(&flow).await?
    };
    flow.release();

    if verified {
        if let Some(target) = flow.navigator().target() {
            println!("Continue at {target}");
        }
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run_once(flow: &Flow) -> bool {
    if !flow.has_session() {
        return false;
    }
    for _ in 0..READY_ATTEMPTS {
        match flow.trigger().await {
            TriggerOutcome::Completed(result) => return result.is_success(),
            // the camera has not delivered a frame yet
            TriggerOutcome::Aborted(FlowError::DeviceNotReady(_)) => {
                tokio::time::sleep(Duration::from_millis(READY_WAIT_MS)).await;
            }
            TriggerOutcome::Aborted(_) | TriggerOutcome::Ignored => return false,
        }
    }
    false
}

async fn run_interactive(flow: &Flow) -> Result<bool, std::io::Error> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" => break,
            "r" => {
                let _ = flow.acquire_device().await;
            }
            "" => {
                if let TriggerOutcome::Completed(VerificationResult::Success { .. }) =
                    flow.trigger().await
                {
                    return Ok(true);
                }
            }
            other => println!("unknown command {other:?}"),
        }
    }
    Ok(false)
}
