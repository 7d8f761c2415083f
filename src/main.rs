use microsh::flags::Flags;
use microsh::shell::Shell;
use std::env;

fn main() -> Result<(), microsh::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("microsh {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    microsh::logging::init(&flags);
    tracing::debug!(?args, "starting session");

    let mut shell = Shell::new(flags)?;
    shell.run()
}
