use glstate_utils::GlArgs;

/// How a [`StateCache`](super::StateCache) is set up.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct StateCacheOptions {
    /// Forward every transition to the driver, redundant or not. Cached
    /// values are still kept up to date.
    pub passthrough: bool,
    /// Enable synchronous debug output right after creation.
    pub debug_output: bool,
    /// Clear color to apply right after creation.
    pub clear_color: Option<[f32; 4]>,
}

impl StateCacheOptions {
    pub fn from_args(args: &GlArgs) -> Self {
        Self {
            passthrough: args.no_state_cache,
            debug_output: args.debug_output,
            clear_color: args.initial_clear_color(),
        }
    }
}
