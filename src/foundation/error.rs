pub type GlimtResult<T> = Result<T, GlimtError>;

#[derive(thiserror::Error, Debug)]
pub enum GlimtError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlimtError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GlimtError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            GlimtError::surface("x")
                .to_string()
                .contains("surface error:")
        );
        assert!(GlimtError::render("x").to_string().contains("render error:"));
        assert!(
            GlimtError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GlimtError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
