/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `database_url` maps to
/// `DATABASE_URL` and so on. A `.env` file in the working directory is read
/// first when present, without overriding variables that are already set.
///
/// # Panics
///
/// `from_env` panics if a required variable is missing or cannot be
/// deserialized. Use `try_from_env` where a failure must be handled.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        Self::try_from_env().expect("failed to load config from environment")
    }

    fn try_from_env() -> Result<Self, envy::Error> {
        let _ = dotenvy::dotenv();
        envy::from_env()
    }

    /// Deserialize from an explicit list of `(KEY, value)` pairs.
    fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}
