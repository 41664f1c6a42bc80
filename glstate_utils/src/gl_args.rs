use argh::FromArgs;
use std::sync::LazyLock;

fn clear_color(color: &str) -> Result<Option<[f32; 4]>, String> {
    let Ok(parts) = color
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
    else {
        return Ok(None);
    };

    let color = match parts.as_slice() {
        [r, g, b, a] => [*r, *g, *b, *a],
        [r, g, b] => [*r, *g, *b, 1.0],
        [v] => [*v, *v, *v, 1.0],
        _ => return Ok(None),
    };

    Ok(Some(color))
}

/// Driver layer arguments
#[derive(Debug, Default, FromArgs)]
pub struct GlArgs {
    /// forward every state transition, even ones the cache considers redundant
    #[argh(switch, hidden_help)]
    pub no_state_cache: bool,
    /// enable synchronous driver debug output when the state cache is created
    #[argh(switch, hidden_help)]
    pub debug_output: bool,

    #[argh(option, hidden_help, from_str_fn(clear_color))]
    pub clear_color: Option<Option<[f32; 4]>>,
}

impl GlArgs {
    fn init() -> Option<GlArgs> {
        let mut args = std::env::args();
        let cmd_name = args.next()?;
        let args: Vec<String> = args.collect();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Self::parse(&cmd_name, &args)
    }

    /// Parses an explicit argument list, `None` if it isn't understood.
    pub fn parse(cmd_name: &str, args: &[&str]) -> Option<GlArgs> {
        GlArgs::from_args(&[cmd_name], args).ok()
    }

    pub fn get() -> &'static GlArgs {
        static INSTANCE: LazyLock<GlArgs> = LazyLock::new(|| GlArgs::init().unwrap_or_default());
        &INSTANCE
    }

    pub fn initial_clear_color(&self) -> Option<[f32; 4]> {
        self.clear_color.flatten()
    }
}
