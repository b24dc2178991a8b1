//! promptbook CLI
//!
//! Usage:
//!   promptbook [OPTIONS] [ID]
//!
//! Options:
//!   -V, --var <KEY=VALUE>      Bind a placeholder
//!   -F, --var-file <KEY=PATH>  Bind a placeholder to a file's contents
//!   -l, --list                 List available templates
//!   -d, --describe             Show the placeholders of a template
//!   --syntax                   Show the template syntax reference
//!   -h, --help                 Print help

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::debug;

use promptbook::{logging, Bindings, Config, Selector, TemplateStore};

/// Lookup failure
const EXIT_NOT_FOUND: i32 = 1;
/// Bad input or unusable configuration
const EXIT_USAGE: i32 = 2;

#[derive(Parser)]
#[command(name = "promptbook")]
#[command(about = "Render prompt templates for AI coding assistants")]
struct Cli {
    /// Template identifier (e.g. godoc-func)
    id: Option<String>,

    /// Bind a placeholder: KEY=VALUE (repeatable)
    #[arg(
        short = 'V',
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = Bindings::parse_assignment
    )]
    vars: Vec<(String, String)>,

    /// Bind a placeholder to a file's contents: KEY=PATH ('-' reads stdin)
    #[arg(
        short = 'F',
        long = "var-file",
        value_name = "KEY=PATH",
        value_parser = Bindings::parse_assignment
    )]
    var_files: Vec<(String, String)>,

    /// Directory of extra templates (overrides the configuration)
    #[arg(short, long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List available templates
    #[arg(short, long)]
    list: bool,

    /// Show the placeholders of ID instead of rendering it
    #[arg(short, long, requires = "id")]
    describe: bool,

    /// Show the template syntax reference
    #[arg(long)]
    syntax: bool,

    /// Do not print warnings about placeholders
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.syntax {
        print_syntax();
        return;
    }

    let color = io::stderr().is_terminal();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(EXIT_USAGE, &format!("Error loading configuration: {}", e)),
    };
    if let Some(dir) = &cli.templates {
        config.store.dir = Some(dir.clone());
    }

    logging::init(&config.logging, cli.verbose, color);
    debug!(store = ?config.store, "configuration resolved");

    // Loaded once; read-only from here on
    let store = match TemplateStore::load(&config.store) {
        Ok(store) => store,
        Err(e) => fail(EXIT_USAGE, &format!("Error loading templates: {}", e)),
    };

    if cli.list {
        print_list(&store);
        return;
    }

    let Some(id) = cli.id.as_deref() else {
        print_intro(&store);
        return;
    };

    let selector = Selector::new(&store);

    if cli.describe {
        match selector.describe(id) {
            Ok(template) => print_description(template),
            Err(e) => not_found(&e, &store),
        }
        return;
    }

    let bindings = match collect_bindings(&cli.var_files, &cli.vars) {
        Ok(bindings) => bindings,
        Err(e) => fail(EXIT_USAGE, &format!("Error: {}", e)),
    };

    match selector.run(id, &bindings) {
        Ok(rendered) => {
            if !cli.quiet {
                if let Some(template) = store.get(id) {
                    for warning in &rendered.warnings {
                        eprint!("{}", warning.format(template, color));
                    }
                }
            }

            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout
                .write_all(rendered.text.as_bytes())
                .and_then(|_| stdout.flush())
            {
                // Ignore a closed pipe (`| head`)
                if e.kind() != io::ErrorKind::BrokenPipe {
                    fail(EXIT_USAGE, &format!("Error writing output: {}", e));
                }
            }
        }
        Err(e) => not_found(&e, &store),
    }
}

/// Merge `--var-file` bindings, then `--var` bindings; later values win
fn collect_bindings(
    var_files: &[(String, String)],
    vars: &[(String, String)],
) -> Result<Bindings, String> {
    let mut bindings = Bindings::new();

    for (key, path) in var_files {
        bindings.insert(key.clone(), read_value_file(path)?);
    }
    for (key, value) in vars {
        bindings.insert(key.clone(), value.clone());
    }

    Ok(bindings)
}

/// Read a binding value from a file or stdin, dropping one trailing newline
/// (`\n` or `\r\n`)
fn read_value_file(path: &str) -> Result<String, String> {
    let mut content = if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("reading from stdin: {}", e))?;
        buffer
    } else {
        fs::read_to_string(Path::new(path))
            .map_err(|e| format!("reading file '{}': {}", path, e))?
    };

    if content.ends_with('\n') {
        content.pop();
        if content.ends_with('\r') {
            content.pop();
        }
    }
    Ok(content)
}

fn not_found(err: &promptbook::SelectError, store: &TemplateStore) -> ! {
    eprintln!("Error: {}", err);
    if err.suggestions().is_empty() {
        let available: Vec<&str> = store.names().collect();
        if !available.is_empty() {
            eprintln!("Available templates: {}", available.join(", "));
        }
    } else {
        eprintln!("Did you mean: {}?", err.suggestions().join(", "));
    }
    process::exit(EXIT_NOT_FOUND);
}

fn fail(code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(code);
}

fn print_list(store: &TemplateStore) {
    let width = store.names().map(str::len).max().unwrap_or(0);
    for template in store.iter() {
        println!(
            "{:<width$}  {}",
            template.id(),
            template.description().unwrap_or(""),
            width = width
        );
    }
}

fn print_description(template: &promptbook::Template) {
    match template.description() {
        Some(description) => println!("{}: {}", template.id(), description),
        None => println!("{}", template.id()),
    }

    if template.placeholders().is_empty() {
        println!("\nNo placeholders.");
        return;
    }

    println!("\nPlaceholders:");
    let width = template.placeholders().keys().map(String::len).max().unwrap_or(0);
    for (name, def) in template.placeholders() {
        let requirement = match &def.default {
            Some(default) => format!("(default: {:?})", default),
            None => "(required)".to_string(),
        };
        match &def.description {
            Some(description) => println!(
                "  {:<width$}  {} {}",
                name,
                description,
                requirement,
                width = width
            ),
            None => println!("  {:<width$}  {}", name, requirement, width = width),
        }
    }
}

fn print_intro(store: &TemplateStore) {
    println!(
        r#"promptbook - prompt templates for AI coding assistants

USAGE:
    promptbook [OPTIONS] <ID>
    promptbook <ID> --var KEY=VALUE --var-file KEY=PATH

OPTIONS:
    -V, --var         Bind a placeholder (KEY=VALUE, repeatable)
    -F, --var-file    Bind a placeholder to a file's contents ('-' for stdin)
    -l, --list        List available templates
    -d, --describe    Show the placeholders of a template
    -t, --templates   Directory of extra templates
    -c, --config      Configuration file (TOML)
    --syntax          Template syntax reference
    -h, --help        Print help

QUICK START:
    promptbook godoc-func --var-file code=handler.go | pbcopy

TEMPLATES:"#
    );
    print_list(store);
}

fn print_syntax() {
    println!(
        r#"PROMPTBOOK TEMPLATE SYNTAX
==========================

FILES
-----
Templates are Markdown files (*.md). The identifier is the path relative
to the template directory without the extension: go/unit-test.md is
"go/unit-test". README.md files and names starting with '.' are skipped.

PLACEHOLDERS
------------
[name]          Substitution point. Names use letters, digits, '_', '.'
                and '-' and start with a letter or '_'.
\[name]         Literal "[name]", never substituted.
\\              A single backslash, so \\[name] is '\' followed by the
                substituted value.
[name](url)     Markdown link, never substituted.
[ ], []byte     Not names; left as they are.

FRONT MATTER
------------
Optional TOML block fenced by '+++' lines at the very top:

    +++
    description = "Generate table-driven unit tests"

    [placeholders.code]
    description = "Source of the function under test"

    [placeholders.framework]
    default = "the standard testing package"
    +++

With a [placeholders] table only the listed names are substituted;
other bracketed names (arr[i], map[string]int) stay literal. Without
it every [name] in the body is a placeholder.

RESOLUTION
----------
Each placeholder takes its --var value, else its default, else the
empty string with a warning on stderr. Bindings that match no
placeholder also produce a warning. Rendering never fails because of
a placeholder."#
    );
}
