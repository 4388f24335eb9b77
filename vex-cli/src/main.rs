use clap::{Parser, Subcommand};
use colored::Colorize;
use vex::Regex;

#[derive(Parser)]
#[command(name = "vex")]
#[command(about = "Vex - a compact bytecode regex engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the pattern matches at the start of the input
    Match {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
    },
    /// Find the first match anywhere in the input
    Search {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
        /// Show capture groups
        #[arg(short, long)]
        verbose: bool,
    },
    /// Find all non-overlapping matches
    Find {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
    },
    /// Replace matches with a template
    Replace {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
        /// Replacement template (\1/$1 refer to groups)
        replacement: String,
        /// Replace only the first match
        #[arg(short, long)]
        first: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Match { pattern, input } => cmd_match(&pattern, &input),
        Commands::Search {
            pattern,
            input,
            verbose,
        } => cmd_search(&pattern, &input, verbose),
        Commands::Find { pattern, input } => cmd_find(&pattern, &input),
        Commands::Replace {
            pattern,
            input,
            replacement,
            first,
        } => cmd_replace(&pattern, &input, &replacement, first),
    }
}

fn compile_or_exit(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            eprintln!("  {}", pattern);
            eprintln!("  {}^", " ".repeat(e.position()));
            std::process::exit(1);
        }
    }
}

fn show(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn cmd_match(pattern: &str, input: &str) {
    let mut regex = compile_or_exit(pattern);

    if regex.matches(input.as_bytes()) {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".red());
        std::process::exit(1);
    }
}

fn cmd_search(pattern: &str, input: &str, verbose: bool) {
    let mut regex = compile_or_exit(pattern);

    match regex.search(input.as_bytes()) {
        Some(found) => {
            println!("{}", "Match found".green().bold());
            println!("  Position: {}..{}", found.position, found.end());
            println!("  Match:    {}", show(&found.matched_text).green());

            if verbose && !found.captures.is_empty() {
                println!();
                println!("{}", "Capture groups:".bold());
                for (i, capture) in found.captures.iter().enumerate() {
                    match capture {
                        Some(c) => println!(
                            "  Group {}: {}..{} = {}",
                            i + 1,
                            c.start,
                            c.end,
                            show(&c.text).green()
                        ),
                        None => println!("  Group {}: {}", i + 1, "<no match>".dimmed()),
                    }
                }
            }
        }
        None => {
            println!("{}", "No match".red());
            std::process::exit(1);
        }
    }
}

fn cmd_find(pattern: &str, input: &str) {
    let mut regex = compile_or_exit(pattern);

    let results = regex.search_all(input.as_bytes());
    if results.is_empty() {
        println!("{}", "No matches found".red());
        return;
    }

    println!(
        "{} {}",
        "Found".bold(),
        format!("{} match(es)", results.len()).green()
    );
    for (i, found) in results.iter().enumerate() {
        println!(
            "  [{}] {}..{} = {}",
            i + 1,
            found.position,
            found.end(),
            show(&found.matched_text).green()
        );
    }
}

fn cmd_replace(pattern: &str, input: &str, replacement: &str, first: bool) {
    let mut regex = compile_or_exit(pattern);

    let result = regex.replace(input.as_bytes(), replacement.as_bytes(), !first);
    println!("{}", show(&result));
}
