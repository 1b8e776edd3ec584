//! mdpress - Command-line entry point
//!
//! Renders, exports and inspects markdown documents using the settings from
//! the user's config directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::debug;

use mdpress::config::{load_config, save_config_silent, Theme};
use mdpress::error::{Error, Result};
use mdpress::export::{export_to_file, ExportFormat, ExportOptions};
use mdpress::files::FileManager;
use mdpress::markdown::{approximate, extract, MarkdownRenderer, TextStats};

#[derive(Parser)]
#[command(name = "mdpress")]
#[command(version, about = "Markdown rendering and export", long_about = None)]
#[command(after_help = "EXAMPLES:
    mdpress render notes.md --toc          Print HTML fragment and contents
    mdpress export notes.md -o notes.html  Write a standalone HTML document
    mdpress meta notes.md                  Print front matter as JSON
    mdpress recent                         List recently opened files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown file to an HTML fragment
    Render {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also print the table of contents
        #[arg(long)]
        toc: bool,
    },

    /// Export a markdown file as a standalone document
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (defaults to FILE with the format's extension)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = FormatArg::Html)]
        format: FormatArg,

        /// Document title (defaults to the front matter title)
        #[arg(long)]
        title: Option<String>,

        /// Override the configured color theme
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Include a table of contents
        #[arg(long)]
        toc: bool,
    },

    /// Print front matter metadata as JSON
    Meta {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Convert an HTML file back to approximate markdown
    Approx {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print word and character counts
    Stats {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List recently opened files that still exist
    Recent,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Html,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => ExportFormat::HtmlFile,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut manager = FileManager::with_settings(load_config());

    let result = run(cli.command, &mut manager);
    save_config_silent(manager.settings());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, manager: &mut FileManager) -> Result<()> {
    let renderer = MarkdownRenderer::with_options(manager.settings().renderer.clone());

    match command {
        Command::Render { file, toc } => {
            let source = read_markdown(manager, &file)?;
            let rendered = renderer.render_with_toc(&source);
            if toc && !rendered.toc.is_empty() {
                println!("{}", rendered.toc);
            }
            print!("{}", rendered.html);
        }
        Command::Export {
            file,
            output,
            format,
            title,
            theme,
            toc,
        } => {
            let source = read_markdown(manager, &file)?;
            let format = ExportFormat::from(format);

            let mut options = ExportOptions::from_settings(manager.settings())
                .with_format(format)
                .with_toc(toc);
            options.title = title;
            if let Some(theme) = theme {
                options.theme = theme.into();
            }

            let output = output.unwrap_or_else(|| file.with_extension(format.extension()));
            export_to_file(&source, &renderer, &output, &options)?;
        }
        Command::Meta { file } => {
            let source = read_markdown(manager, &file)?;
            let metadata = extract(&source);
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Command::Approx { file } => {
            let html = fs::read_to_string(&file).map_err(|source| Error::FileRead {
                path: file.clone(),
                source,
            })?;
            println!("{}", approximate(&html));
        }
        Command::Stats { file } => {
            let source = read_markdown(manager, &file)?;
            println!("{}", TextStats::from_document(&source).format_detailed());
        }
        Command::Recent => {
            for path in manager.settings_mut().existing_recent_files() {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn read_markdown(manager: &mut FileManager, path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    manager.open_file(path)
}
