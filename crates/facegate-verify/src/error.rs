use std::fmt;

#[derive(Debug)]
pub enum VerifyError {
    Http(reqwest::Error),
    /// The page has no `csrfmiddlewaretoken` field.
    MissingToken(String),
    InvalidUrl(String),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Http(err) => write!(f, "{err}"),
            VerifyError::MissingToken(url) => {
                write!(f, "no anti-forgery token found on {url}")
            }
            VerifyError::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for VerifyError {
    fn from(err: reqwest::Error) -> Self {
        VerifyError::Http(err)
    }
}
