use anyhow::Result;
use pico_args::Arguments;
use prompt_powerline::config::{self, CONFIG_ENV};
use prompt_powerline::utils::init_logging;
use prompt_powerline::{Engine, Environment, ProcessEnvironment};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    debug: bool,
    print_config: bool,
    help: bool,
}

impl Args {
    fn from_env() -> Result<Self> {
        let mut args = Arguments::from_env();

        Ok(Self {
            config: args
                .opt_value_from_str::<_, PathBuf>("--config")?
                .or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from)),
            debug: args.contains("--debug"),
            print_config: args.contains("--print-config"),
            help: args.contains(["-h", "--help"]),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::from_env()?;

    if args.help {
        print_help();
        return Ok(());
    }

    init_logging(args.debug);

    let config = config::load_config(args.config).await?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // one environment per render pass, so its query cache never outlives it
    let env: Arc<dyn Environment> =
        Arc::new(ProcessEnvironment::new(Handle::current(), config.command_timeout()));
    let engine = Engine::from_config(&config);

    let prompt = engine.render_prompt(&config.segments, env).await;
    print!("{}", prompt);

    Ok(())
}

fn print_help() {
    println!("prompt-powerline - segment based shell prompt renderer");
    println!();
    println!("USAGE:");
    println!("    prompt-powerline [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <FILE>        Custom config file path");
    println!("    --print-config         Print the effective configuration as JSON");
    println!("    --debug                Log segment evaluation to stderr");
    println!("    -h, --help             Show this help message");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    PROMPT_POWERLINE_CONFIG        Override config path");
    println!("    PROMPT_POWERLINE_SEPARATOR     Override segment separator");
    println!("    PROMPT_POWERLINE_TIMEOUT_MS    Override external command timeout");
    println!("    PROMPT_POWERLINE_DEBUG         Enable debug logging");
    println!("    PROMPT_POWERLINE_LOG           tracing filter directive");
}
