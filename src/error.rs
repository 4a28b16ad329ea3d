pub type TemporaResult<T> = Result<T, TemporaError>;

#[derive(thiserror::Error, Debug)]
pub enum TemporaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TemporaError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            TemporaError::config("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            TemporaError::resource("x")
                .to_string()
                .contains("resource error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = TemporaError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
