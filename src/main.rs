/// Main liverseg entry point for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = cli::Cli::parse();

    // Narrowed again once the config is loaded.
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .init();
    log::set_max_level(cli.startup_level().into());

    let config = cli::load_config(&cli)?;
    log::set_max_level(config.log_level.into());

    cli::run(cli, config)
}

// The client has no browser entry point.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::cell::Cell;
    use std::io::BufRead;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::sync::mpsc::{self, RecvTimeoutError};
    use std::thread;
    use std::time::Duration;

    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};

    use liverseg::LiverSegApp;
    use liverseg::commands::{HELP_TEXT, ShellCommand};
    use liverseg::config::{AppConfig, LogLevel};
    use liverseg::constants::POLL_INTERVAL_MS;
    use liverseg::message::Message;
    use liverseg::model::UploadFile;
    use liverseg::service::{HttpSegmentationService, SegmentationService};
    use liverseg::state::UploadState;
    use liverseg::uploader::UploaderEvent;

    #[derive(Parser)]
    #[command(
        name = "liverseg-native",
        about = "Upload CT scans for automatic liver segmentation"
    )]
    pub struct Cli {
        /// Config file (default: <config dir>/liverseg/liverseg-config.json)
        #[arg(long, global = true)]
        config: Option<PathBuf>,

        /// Segmentation service origin, e.g. http://localhost:8000
        #[arg(long, global = true)]
        origin: Option<String>,

        /// Log verbosity: error, warn, info, debug or trace
        #[arg(long, global = true)]
        log_level: Option<LogLevel>,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Upload scans and print the segmentation result.
        /// Several files are submitted back to back without waiting.
        Upload {
            /// DICOM / NIfTI files
            #[arg(required = true)]
            files: Vec<PathBuf>,

            /// Hide the mask overlay in the final view and export
            #[arg(long)]
            hide_mask: bool,

            /// Mask opacity, 0.0-1.0 in steps of 0.1
            #[arg(long)]
            opacity: Option<f32>,

            /// Write the base image with the overlay applied to this PNG
            #[arg(long)]
            export: Option<PathBuf>,
        },
        /// Line-oriented shell with drop, pick and overlay controls
        Interactive,
        /// Check that the segmentation service is up
        Health,
        /// Print the effective configuration
        Config {
            /// Save it to the default config path
            #[arg(long)]
            write: bool,
        },
    }

    impl Cli {
        /// Level used while the config is loading.
        pub fn startup_level(&self) -> LogLevel {
            self.log_level.unwrap_or_default()
        }
    }

    /// Resolve configuration: file (explicit or default path), then flags.
    pub fn load_config(cli: &Cli) -> Result<AppConfig> {
        let mut config = match &cli.config {
            Some(path) => AppConfig::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AppConfig::load_from_default_path().unwrap_or_default(),
        };

        if let Some(origin) = &cli.origin {
            config.service.origin = origin.clone();
            config.service.validate()?;
        }
        if let Some(level) = cli.log_level {
            config.log_level = level;
        }
        Ok(config)
    }

    pub fn run(cli: Cli, config: AppConfig) -> Result<()> {
        match cli.command {
            Command::Upload {
                files,
                hide_mask,
                opacity,
                export,
            } => upload(config, files, hide_mask, opacity, export),
            Command::Interactive => interactive(config),
            Command::Health => health(config),
            Command::Config { write } => {
                if write {
                    let path = config.save_to_default_path()?;
                    println!("Saved configuration to {}", path.display());
                } else {
                    println!("{}", config.to_json()?);
                }
                Ok(())
            }
        }
    }

    /// Create the app and a flag raised by every state transition.
    fn create_app(config: AppConfig) -> Result<(LiverSegApp, Rc<Cell<bool>>)> {
        let mut app = LiverSegApp::with_http(config).context("Failed to create HTTP client")?;
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        app.subscribe(move |state| {
            log::debug!("State is now '{}'", state.name());
            flag.set(true);
        });
        Ok((app, dirty))
    }

    fn render(app: &LiverSegApp) {
        println!("{}\n", app.view());
    }

    fn upload(
        config: AppConfig,
        files: Vec<PathBuf>,
        hide_mask: bool,
        opacity: Option<f32>,
        export: Option<PathBuf>,
    ) -> Result<()> {
        let (mut app, dirty) = create_app(config)?;

        for path in &files {
            let file = UploadFile::from_path(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            app.update(Message::Uploader(UploaderEvent::Drop(vec![file])));
        }
        render(&app);
        dirty.set(false);

        while app.is_busy() {
            app.tick();
            if dirty.replace(false) {
                render(&app);
            }
            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        }
        if app.tick() || dirty.replace(false) {
            render(&app);
        }

        if let UploadState::Failure(message) = app.state() {
            bail!("Segmentation failed: {message}");
        }

        let mut adjusted = false;
        if hide_mask && app.viewer().is_some_and(|v| v.overlay().visible()) {
            app.update(Message::toggle_mask());
            adjusted = true;
        }
        if let Some(value) = opacity {
            app.update(Message::opacity(value));
            adjusted = true;
        }
        if adjusted {
            render(&app);
        }

        if let Some(path) = export {
            app.export_composite(&path)
                .with_context(|| format!("Failed to export {}", path.display()))?;
            println!("Composite written to {}", path.display());
        }
        Ok(())
    }

    fn read_files(paths: &[PathBuf]) -> Vec<UploadFile> {
        paths
            .iter()
            .filter_map(|path| match UploadFile::from_path(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    eprintln!("Cannot read {}: {}", path.display(), e);
                    None
                }
            })
            .collect()
    }

    /// Apply one shell command. Returns false when the shell should exit.
    fn run_command(app: &mut LiverSegApp, command: ShellCommand) -> bool {
        match command {
            ShellCommand::Drop(paths) => {
                let files = read_files(&paths);
                app.update(Message::Uploader(UploaderEvent::Drop(files)));
            }
            ShellCommand::Pick(paths) => {
                let files = read_files(&paths);
                app.update(Message::Uploader(UploaderEvent::Picked(files)));
            }
            ShellCommand::DragEnter => app.update(Message::drag_enter()),
            ShellCommand::DragLeave => app.update(Message::drag_leave()),
            ShellCommand::Toggle => app.update(Message::toggle_mask()),
            ShellCommand::Opacity(value) => app.update(Message::opacity(value)),
            ShellCommand::Export(path) => match app.export_composite(&path) {
                Ok(()) => println!("Composite written to {}", path.display()),
                Err(e) => eprintln!("Export failed: {e}"),
            },
            ShellCommand::Show => {}
            ShellCommand::Help => {
                println!("{HELP_TEXT}");
                return true;
            }
            ShellCommand::Quit => return false,
        }
        if let Some(status) = app.take_status() {
            println!("{status}");
        }
        render(app);
        true
    }

    fn interactive(config: AppConfig) -> Result<()> {
        let (mut app, dirty) = create_app(config)?;

        let (line_tx, line_rx) = mpsc::channel::<String>();
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
            })
            .context("Failed to spawn stdin reader")?;

        render(&app);
        println!("Type 'help' for commands.");

        loop {
            app.tick();
            if dirty.replace(false) {
                render(&app);
            }

            match line_rx.recv_timeout(Duration::from_millis(POLL_INTERVAL_MS)) {
                Ok(line) => match ShellCommand::parse(&line) {
                    Ok(Some(command)) => {
                        if !run_command(&mut app, command) {
                            break;
                        }
                        // run_command already rendered any transition it caused
                        dirty.set(false);
                    }
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if app.is_busy() {
            log::info!("Exiting with requests still in flight");
        }
        Ok(())
    }

    fn health(config: AppConfig) -> Result<()> {
        let service = HttpSegmentationService::new(config.service.clone())
            .context("Failed to create HTTP client")?;
        let status = service
            .health()
            .with_context(|| format!("Health check against {} failed", service.origin()))?;

        println!(
            "{}: {} ({})",
            service.origin(),
            status.status,
            status.model.as_deref().unwrap_or("unknown model")
        );
        if !status.is_healthy() {
            bail!("Service reports status '{}'", status.status);
        }
        Ok(())
    }
}
