mod gl_args;
mod logging;

pub use gl_args::GlArgs;

pub use tracing;
