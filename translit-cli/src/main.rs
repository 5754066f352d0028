use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use translit_core::{Composer, RuleSet};

mod loader;

#[derive(Parser)]
#[command(name = "translit")]
#[command(about = "Translit - rule-based transliteration for input methods")]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transliterate a buffer once
    Run {
        /// Rule set file
        file: PathBuf,
        /// The input buffer
        input: String,
        /// The context buffer
        #[arg(short, long, default_value = "")]
        context: String,
        /// Request the AltGr rules
        #[arg(short, long)]
        alt_gr: bool,
        /// Show which rule applied
        #[arg(short, long)]
        verbose: bool,
    },
    /// Type keys one at a time, the way an input method would
    Type {
        /// Rule set file
        file: PathBuf,
        /// Keystrokes to type
        keys: String,
        /// Hold AltGr for every key
        #[arg(short, long)]
        alt_gr: bool,
        /// Show the text after each key
        #[arg(short, long)]
        verbose: bool,
    },
    /// Validate rule set files
    Check {
        /// Rule set files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show rule set metadata and rules
    Info {
        /// Rule set file
        file: PathBuf,
    },
    /// Resolve a rule set by id from a directory and transliterate
    Lookup {
        /// Directory of rule set files
        #[arg(short, long, default_value = "rulesets")]
        dir: PathBuf,
        /// Rule set id
        name: String,
        /// The input buffer
        input: String,
        /// The context buffer
        #[arg(short, long, default_value = "")]
        context: String,
        /// Request the AltGr rules
        #[arg(short, long)]
        alt_gr: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Run {
            file,
            input,
            context,
            alt_gr,
            verbose,
        } => cmd_run(&file, &input, &context, alt_gr, verbose),
        Commands::Type {
            file,
            keys,
            alt_gr,
            verbose,
        } => cmd_type(&file, &keys, alt_gr, verbose),
        Commands::Check { files } => cmd_check(&files),
        Commands::Info { file } => cmd_info(&file),
        Commands::Lookup {
            dir,
            name,
            input,
            context,
            alt_gr,
        } => cmd_lookup(&dir, &name, &input, &context, alt_gr),
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("translit_core=debug,translit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    std::process::exit(1);
}

fn load_or_exit(file: &Path) -> RuleSet {
    loader::load_rule_set(file).unwrap_or_else(|e| fail(e))
}

fn cmd_run(file: &Path, input: &str, context: &str, alt_gr: bool, verbose: bool) {
    let rule_set = load_or_exit(file);

    if verbose {
        println!("{}", "Transliterating...".bold());
        println!("  Rule set: {}", rule_set.id().cyan());
        println!("  Input:    {}", input.yellow());
        println!("  Context:  {}", context.yellow());
        println!("  AltGr:    {}", alt_gr);
        println!();

        match rule_set.find_rule(input, context, alt_gr) {
            Some((index, rule)) => {
                println!("{}", "✓ Rule applied".green().bold());
                println!("  [{}] {} → {}", index, rule.input().cyan(), rule.replacement().green());
            }
            None => println!("{}", "✗ No rule applies".red()),
        }
        println!();
    }

    println!("{}", rule_set.transliterate(input, context, alt_gr));
}

fn cmd_type(file: &Path, keys: &str, alt_gr: bool, verbose: bool) {
    let rule_set = load_or_exit(file);
    let mut composer = Composer::new(&rule_set);

    for key in keys.chars() {
        let text = composer.press(key, alt_gr);
        if verbose {
            println!("  {} → {}", key.to_string().yellow(), text.green());
        }
    }

    println!("{}", composer.text());
}

fn cmd_check(files: &[PathBuf]) {
    let mut failures = 0;

    for file in files {
        match loader::load_rule_set(file) {
            Ok(rule_set) => println!(
                "{} {} ({} rules)",
                "✓".green().bold(),
                rule_set.id().cyan(),
                rule_set.len()
            ),
            Err(e) => {
                failures += 1;
                println!("{} {}", "✗".red().bold(), e);
            }
        }
    }

    if failures > 0 {
        eprintln!(
            "{} {}",
            "Error:".red().bold(),
            format!("{failures} of {} file(s) failed", files.len())
        );
        std::process::exit(1);
    }
}

fn cmd_info(file: &Path) {
    let rule_set = load_or_exit(file);
    let info = rule_set.info();

    println!("{}", info.name.bold());
    println!("  Id:             {}", info.id.cyan());
    println!("  Description:    {}", info.description);
    println!("  Author:         {}", info.author);
    println!("  Version:        {}", info.version);
    println!("  Max key length: {}", info.max_key_length);
    println!("  Context length: {}", info.context_length);
    println!();
    println!(
        "{} {}",
        "Rules".bold(),
        format!("({})", rule_set.len()).green()
    );

    for (index, rule) in rule_set.rules().iter().enumerate() {
        let mut line = format!("  [{}] {} → {}", index, rule.input().cyan(), rule.replacement().green());
        if let Some(context) = rule.context() {
            line.push_str(&format!("  context: {}", context.yellow()));
        }
        if rule.alt_gr() {
            line.push_str(&format!("  {}", "AltGr".magenta()));
        }
        println!("{line}");
    }
}

fn cmd_lookup(dir: &Path, name: &str, input: &str, context: &str, alt_gr: bool) {
    let rule_set = match loader::lookup(dir, name) {
        Ok(rule_set) => rule_set,
        Err(e) if e.is_not_found() => {
            eprintln!("{} {}", "Not found:".red().bold(), name);
            std::process::exit(2);
        }
        Err(e) => fail(e),
    };

    println!("{}", rule_set.transliterate(input, context, alt_gr));
}
