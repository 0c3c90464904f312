//! Connection settings as seen by a command.
//!
//! `main` resolves a [`eiam_config::Config`] for every command that talks to
//! the console. `config` subcommands only edit the profile file, so they get
//! [`ConfigCommandContext::Placeholder`] and never see missing-URL errors.

pub(crate) enum ConfigCommandContext {
    /// Validated settings from profile, environment and flags.
    Real(Box<eiam_config::Config>),
    /// Only valid for `config` subcommands.
    Placeholder,
}

impl ConfigCommandContext {
    pub(crate) fn into_real_config(self) -> anyhow::Result<eiam_config::Config> {
        match self {
            ConfigCommandContext::Real(config) => Ok(*config),
            ConfigCommandContext::Placeholder => {
                anyhow::bail!("Internal error: console command dispatched with a placeholder config")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_real_config_is_extracted() {
        let config = eiam_config::Config::with_api_token(
            "http://localhost:1989".to_string(),
            SecretString::new("token".to_string().into()),
        );
        let ctx = ConfigCommandContext::Real(Box::new(config));
        let extracted = ctx.into_real_config().unwrap();
        assert_eq!(extracted.connection.base_url, "http://localhost:1989");
    }

    #[test]
    fn test_placeholder_refuses_extraction() {
        let err = ConfigCommandContext::Placeholder
            .into_real_config()
            .unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }
}
