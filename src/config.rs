use crate::i18n::LanguageTag;
use anyhow::{bail, Context, Result};
use std::fmt;

#[derive(Clone)]
pub struct Config {
    // Database
    pub dsn: String,
    pub user: Option<String>,
    pub password: Option<String>,

    // Lexicons
    pub languages: Vec<LanguageTag>,
    pub lexicons: Vec<String>,
    pub default_lexicon: String,
    pub default_lang: LanguageTag,

    // Record missing keys in the database
    pub fail_with: bool,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the configuration from a variable lookup function.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let dsn = non_empty("I18N_DSN")
            .or_else(|| non_empty("DATABASE_URL"))
            .context("I18N_DSN (or DATABASE_URL) not set")?;

        let languages = split_list(&non_empty("I18N_LANGUAGES").context("I18N_LANGUAGES not set")?)
            .into_iter()
            .map(|code| LanguageTag::parse(&code))
            .collect::<Result<Vec<_>>>()
            .context("Invalid language in I18N_LANGUAGES")?;
        if languages.is_empty() {
            bail!("I18N_LANGUAGES must name at least one language");
        }

        let lexicons = split_list(&non_empty("I18N_LEXICONS").context("I18N_LEXICONS not set")?);
        let default_lexicon = match non_empty("I18N_DEFAULT_LEXICON") {
            Some(name) => name.trim().to_string(),
            None => lexicons
                .first()
                .cloned()
                .context("I18N_LEXICONS must name at least one lexicon")?,
        };

        let default_lang =
            LanguageTag::parse(non_empty("I18N_DEFAULT_LANG").as_deref().unwrap_or("en"))
                .context("Invalid I18N_DEFAULT_LANG")?;

        let fail_with = non_empty("I18N_FAIL_WITH")
            .map(|v| parse_bool(&v))
            .transpose()
            .context("Invalid I18N_FAIL_WITH")?
            .unwrap_or(true);

        let port = non_empty("PORT")
            .map(|v| v.trim().parse::<u16>())
            .transpose()
            .context("Invalid PORT")?
            .unwrap_or(8080);

        Ok(Self {
            dsn,
            user: non_empty("I18N_DB_USER"),
            password: var("I18N_DB_PASSWORD"),
            languages,
            lexicons,
            default_lexicon,
            default_lang,
            fail_with,
            port,
        })
    }

    /// Whether the default language is one of the configured languages.
    ///
    /// When it is not, a client with no loaded preference cannot be served.
    pub fn default_lang_configured(&self) -> bool {
        self.languages.contains(&self.default_lang)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("dsn", &self.dsn)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("languages", &self.languages)
            .field("lexicons", &self.lexicons)
            .field("default_lexicon", &self.default_lexicon)
            .field("default_lang", &self.default_lang)
            .field("fail_with", &self.fail_with)
            .field("port", &self.port)
            .finish()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("Expected a boolean, got '{}'", other),
    }
}
