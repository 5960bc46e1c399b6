use super::ConfigError;

/// Constructor validation lifecycle shared by kernel structs.
///
/// A kernel that exists was validated; run entrypoints only need to check
/// what depends on the data they are handed.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}
