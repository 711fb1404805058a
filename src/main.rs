use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use botlog::cli::{Action, Cli, ColorMode, ExtractArgs, MemberArgs, MessagesArgs, ParseArgs};
use botlog::config::Config;
use botlog::error::BotlogError;
use botlog::parser::{LogRecordParser, ParsedLog};
use botlog::telegram::{self, TelegramFetcher};
use botlog::{download, extract, formatter};

fn main() -> ExitCode {
    // Reset SIGPIPE to default behavior so `botlog messages | head` exits
    // quietly instead of failing on a closed stdout.
    reset_sigpipe();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("botlog: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(BotlogError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("botlog: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<(), BotlogError> {
    match &cli.action {
        Action::Parse(args) => run_parse(args, config),
        Action::Extract(args) => block_on(run_extract(args, config)),
        Action::Messages(args) => run_messages(args, config),
        Action::Commands => block_on(run_commands(config)),
        Action::Member(args) => block_on(run_member(args, config)),
        Action::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "botlog", &mut io::stdout());
            Ok(())
        }
    }
}

fn run_parse(args: &ParseArgs, config: &Config) -> Result<(), BotlogError> {
    let parser = LogRecordParser::new(&config.marker)?;
    let log = parser.parse_file(&args.log)?;

    let output = args.output.clone().unwrap_or_else(|| {
        let mut name = args.log.clone().into_os_string();
        name.push(".json");
        PathBuf::from(name)
    });
    std::fs::write(&output, log.to_json(args.pretty)?)?;

    info!(records = log.len(), output = %output.display(), "log converted");
    Ok(())
}

async fn run_extract(args: &ExtractArgs, config: &Config) -> Result<(), BotlogError> {
    let log = ParsedLog::load(&args.parsed)?;
    let dir = extract::chat_dir(&config.out_dir, &config.chat_title);
    std::fs::create_dir_all(&dir)?;

    if !args.no_download {
        info!(dir = %dir.display(), "collecting documents");
        let docs = extract::collect_documents(&log, &config.chat_title);
        let fetcher = TelegramFetcher::new(telegram::build_bot(config)?);
        let summary = download::download_documents(&fetcher, &docs, &dir).await;
        info!(
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            "documents done"
        );
    }

    info!(dir = %dir.display(), "collecting messages");
    let messages = extract::collect_messages(&log, &config.chat_title);
    let written = extract::dump_messages(
        &messages,
        &dir.join("messages.txt"),
        config.timestamp_format.as_deref(),
    )?;
    info!(lines = written, "transcript written");
    Ok(())
}

fn run_messages(args: &MessagesArgs, config: &Config) -> Result<(), BotlogError> {
    let log = ParsedLog::load(&args.parsed)?;
    let messages = extract::collect_messages(&log, &config.chat_title);
    let use_color = resolve_color_mode(config.color_mode);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    formatter::write_transcript(
        &messages,
        &mut writer,
        config.timestamp_format.as_deref(),
        use_color,
    )?;
    Ok(())
}

async fn run_commands(config: &Config) -> Result<(), BotlogError> {
    let bot = telegram::build_bot(config)?;
    let registered = telegram::register_commands(&bot, &config.commands).await?;
    for command in registered {
        println!("/{} - {}", command.command, command.description);
    }
    Ok(())
}

async fn run_member(args: &MemberArgs, config: &Config) -> Result<(), BotlogError> {
    let chat = config.resolve_chat(&args.chat)?;
    let user = config.resolve_user(&args.user)?;
    let bot = telegram::build_bot(config)?;
    let member = telegram::inspect_member(&bot, chat, user).await?;
    println!("{member:#?}");
    Ok(())
}

/// Run a Bot API task on a single-threaded runtime.
fn block_on<F>(future: F) -> Result<(), BotlogError>
where
    F: Future<Output = Result<(), BotlogError>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "botlog=debug" } else { "botlog=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_color_mode(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            let stdout = io::stdout();
            if !stdout.is_terminal() {
                return false;
            }
            if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                return false;
            }
            if std::env::var("TERM").is_ok_and(|v| v == "dumb") {
                return false;
            }
            true
        }
    }
}

/// Reset SIGPIPE to the default (terminate) behavior.
///
/// By default, Rust ignores SIGPIPE to surface `BrokenPipe` I/O errors.
/// For a CLI whose output is routinely piped into `head` or `grep -m`,
/// letting the OS handle the signal is the expected behavior.
#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}
