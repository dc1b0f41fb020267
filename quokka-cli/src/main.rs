//! Quokka CLI
//!
//! Inspect how stylesheets are read and run the cascade against a JSON
//! element tree without a UI.

mod document;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use quokka_common::logging;
use quokka_css::host::{DEFAULT_DOTS_PER_MILLIMETER, DEFAULT_FONT_SIZE};
use quokka_css::{
    ElementMetrics, PointerEvent, PropertyValue, RecordingHost, Selector, SelectorGroup, StyleError, StyleSheet,
    apply, evaluate, parse_nth, tokenize_expression,
};
use quokka_dom::{Document, NodeId};

/// Quokka style engine inspector
#[derive(Parser, Debug)]
#[command(name = "quokka")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the selector groups of a stylesheet
    quokka parse theme.css

    # Read a style attribute
    quokka parse --inline --css 'color: red; width: calc(100% - 4px)'

    # Evaluate arithmetic
    quokka eval '2 + 3 * (4 - 1)'

    # Which children does 2n+1 select among 7?
    quokka nth 2n+1 --children 7

    # Cascade a stylesheet onto a document, then hover #save
    quokka apply theme.css --document tree.json --hover save
"#)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace); QUOKKA_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a stylesheet and print the rule model
    Parse {
        #[command(flatten)]
        source: CssSource,

        /// Read the input as a declaration list, like a `style` attribute
        #[arg(long)]
        inline: bool,

        /// Print the rule model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate an arithmetic expression
    Eval {
        /// Expression such as "2 + 3 * (4 - 1)"
        expression: String,
    },

    /// Show the children an nth-child argument selects
    Nth {
        /// Argument such as "2n+1", "odd" or "3"
        argument: String,

        /// Number of children
        #[arg(long, default_value = "10")]
        children: usize,
    },

    /// Run the cascade against a document and print what reached the host
    Apply {
        #[command(flatten)]
        source: CssSource,

        /// JSON element tree
        #[arg(short, long, value_name = "FILE")]
        document: PathBuf,

        #[command(flatten)]
        metrics: MetricsArgs,

        /// Afterwards fire the hover handler of the element with this id
        #[arg(long, value_name = "ID")]
        hover: Option<String>,

        /// Afterwards fire the press handler of the element with this id
        #[arg(long, value_name = "ID")]
        press: Option<String>,
    },
}

#[derive(Args, Debug)]
struct CssSource {
    /// Stylesheet file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Stylesheet text instead of a file
    #[arg(long, value_name = "CSS")]
    css: Option<String>,
}

impl CssSource {
    fn load(&self) -> Result<String> {
        if let Some(ref css) = self.css {
            Ok(css.clone())
        } else if let Some(ref path) = self.path {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        } else {
            bail!("a stylesheet file or --css is required")
        }
    }
}

#[derive(Args, Debug)]
struct MetricsArgs {
    /// Viewport as WIDTHxHEIGHT; the parent size of unsized top-level elements
    #[arg(long, default_value = "1280x720", value_parser = parse_viewport)]
    viewport: (f64, f64),

    /// Font size in pixels for em and ex
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f64,

    /// Dots per millimetre for physical units
    #[arg(long, default_value_t = DEFAULT_DOTS_PER_MILLIMETER)]
    dpmm: f64,
}

impl MetricsArgs {
    const fn base(&self) -> ElementMetrics {
        ElementMetrics {
            parent_width: self.viewport.0,
            parent_height: self.viewport.1,
            font_size: self.font_size,
            dots_per_millimeter: self.dpmm,
        }
    }
}

fn parse_viewport(text: &str) -> Result<(f64, f64), String> {
    let (width, height) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{text}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid size '{s}': {e}"))
    };
    Ok((parse(width)?, parse(height)?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Parse {
            source,
            inline,
            json,
        } => run_parse(&source.load()?, inline, json),
        Command::Eval { expression } => run_eval(&expression),
        Command::Nth { argument, children } => run_nth(&argument, children),
        Command::Apply {
            source,
            document,
            metrics,
            hover,
            press,
        } => {
            let css = source.load()?;
            let tree = document::load(&document)?;
            run_apply(&css, &tree, metrics.base(), hover.as_deref(), press.as_deref())
        }
    }
}

fn run_parse(css: &str, inline: bool, json: bool) -> Result<()> {
    let mut sheet = StyleSheet::new();
    let groups = if inline {
        vec![sheet.parse_inline(css)]
    } else {
        sheet.parse(css);
        sheet.groups.clone()
    };

    if json {
        let out = if inline {
            serde_json::to_string_pretty(&groups)?
        } else {
            serde_json::to_string_pretty(&sheet)?
        };
        println!("{out}");
        return Ok(());
    }

    println!("=== Selector Groups ===");
    for group in &groups {
        print_group(group);
    }

    if !sheet.custom_vars.is_empty() {
        println!("\n=== Custom Properties ===");
        for (name, values) in &sheet.custom_vars {
            println!("  {}: {}", name.cyan(), values.join(" "));
        }
    }
    Ok(())
}

fn print_group(group: &SelectorGroup) {
    let selectors: Vec<String> = group.selectors.iter().map(render_selector).collect();
    let head = if selectors.is_empty() {
        "(inline)".to_string()
    } else {
        selectors.join(", ")
    };
    println!("{}", head.bold());
    for rule in &group.rules {
        println!(
            "  {}: {}  {}",
            rule.property.cyan(),
            render_values(&rule.values),
            format!("[{} #{}]", rule.invocation, rule.sort).dimmed()
        );
    }
}

fn render_selector(selector: &Selector) -> String {
    selector
        .parts
        .iter()
        .map(|part| {
            if part.args.is_empty() {
                format!("{}<{}>", part.name, part.select_type)
            } else {
                format!("{}({})<{}>", part.name, part.args.join(" "), part.select_type)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_values(values: &[PropertyValue]) -> String {
    values
        .iter()
        .map(|value| {
            if value.is_function() {
                format!("{}({})", value.text, value.args.join(" "))
            } else {
                value.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_eval(expression: &str) -> Result<()> {
    let tokens = tokenize_expression(expression)?;
    tracing::debug!(?tokens, "tokenized");
    println!("{}", evaluate(&tokens)?);
    Ok(())
}

/// Read `argument` the way a selector would, then select among `children`.
fn run_nth(argument: &str, children: usize) -> Result<()> {
    let mut sheet = StyleSheet::new();
    sheet.parse(&format!("x:nth-child({argument}) {{}}"));
    let args = sheet
        .groups
        .first()
        .and_then(|g| g.selectors.first())
        .and_then(|s| s.parts.get(1))
        .map(|p| p.args.clone())
        .unwrap_or_default();

    let (start, step) = parse_nth(&args, children)?;
    println!("arguments: {}", args.join(" "));
    println!("start {start}, step {step}");

    let start = usize::try_from(start)?;
    let step = usize::try_from(step)?;
    let selected: Vec<String> = (start..children).step_by(step).map(|i| i.to_string()).collect();
    println!("selected child indices: {}", selected.join(", ").green());
    Ok(())
}

fn describe(document: &Document, element: NodeId) -> String {
    let Some(data) = document.as_element(element) else {
        return format!("#{}", element.0);
    };
    let mut label = data.tag_name.clone();
    if let Some(id) = data.id() {
        label.push('#');
        label.push_str(id);
    }
    let mut classes: Vec<&str> = data.classes().into_iter().collect();
    classes.sort_unstable();
    for class in classes {
        label.push('.');
        label.push_str(class);
    }
    label
}

fn print_applied(host: &RecordingHost, document: &Document) {
    for element in document.elements() {
        let mut applied = host.applied_to(element).peekable();
        if applied.peek().is_none() {
            continue;
        }
        println!("{}", describe(document, element).bold());
        for entry in applied {
            println!("  {}: {}", entry.property.cyan(), render_values(&entry.values));
        }
    }
}

fn print_problems(problems: &[StyleError]) {
    if problems.is_empty() {
        return;
    }
    println!("\n=== Problems ===");
    for problem in problems {
        println!("  - {}", problem.red());
    }
}

fn fire(
    host: &mut RecordingHost,
    document: &Document,
    id: &str,
    event: PointerEvent,
) -> Result<()> {
    let Some(element) = document.element_by_id(id) else {
        bail!("no element with id '{id}'");
    };
    host.reset_log();
    println!("\n=== {event} #{id} ===");
    match host.dispatch(element, event, document) {
        Some(problems) => {
            print_applied(host, document);
            print_problems(&problems);
        }
        None => println!("{}", "no handler registered".yellow()),
    }
    Ok(())
}

fn run_apply(
    css: &str,
    tree: &document::LoadedTree,
    base: ElementMetrics,
    hover: Option<&str>,
    press: Option<&str>,
) -> Result<()> {
    let mut sheet = StyleSheet::new();
    sheet.parse(css);

    let document = &tree.document;
    let mut host = RecordingHost::with_metrics(base);
    for element in document.elements() {
        host.set_metrics(element, tree.metrics_for(element, base));
    }

    let problems = apply(&sheet, document, &mut host);
    tracing::info!(
        applied = host.applied().len(),
        handlers = host.handler_count(),
        "cascade applied"
    );

    println!("=== Applied ===");
    print_applied(&host, document);
    print_problems(&problems);

    if let Some(id) = hover {
        fire(&mut host, document, id, PointerEvent::Enter)?;
    }
    if let Some(id) = press {
        fire(&mut host, document, id, PointerEvent::Press)?;
    }
    Ok(())
}
