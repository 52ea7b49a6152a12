//! mdbrowse CLI - fetch web pages as Markdown, render Markdown, serve MCP

mod mcp;

use clap::{Parser, Subcommand, ValueEnum};
use mdbrowse::{render_page, BrowseRequest, PageContent, Tool, TOOL_LLMTXT};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Output format for fetch subcommand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown with YAML frontmatter
    #[default]
    Md,
    /// PageContent as JSON
    Json,
    /// Markdown rendered to HTML
    Html,
}

/// mdbrowse - browse the web as Markdown
#[derive(Parser, Debug)]
#[command(name = "mdbrowse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

/// Transport settings shared by fetch and mcp
#[derive(clap::Args, Debug, Clone, Default)]
struct ClientArgs {
    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long)]
    timeout: Option<u64>,
}

impl ClientArgs {
    fn build_tool(&self) -> Tool {
        let mut builder = Tool::builder();
        if let Some(ref ua) = self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(secs) = self.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp {
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Fetch URL and output it as Markdown
    Fetch {
        /// URL to fetch
        url: String,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,

        /// Do not advertise Markdown in the Accept header
        #[arg(long)]
        no_accept_md: bool,

        /// Keep HTML responses as raw HTML
        #[arg(long)]
        raw: bool,

        #[command(flatten)]
        client: ClientArgs,
    },
    /// Render a local Markdown file to HTML
    Render {
        /// Markdown file (stdin when omitted)
        file: Option<PathBuf>,

        /// URL relative references are resolved against
        #[arg(long, default_value = "")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Mcp { client }) => {
            mcp::run_server(client.build_tool()).await;
        }
        Some(Commands::Fetch {
            url,
            output,
            no_accept_md,
            raw,
            client,
        }) => {
            let mut request = BrowseRequest::new(url);
            if no_accept_md {
                request = request.without_accept_md();
            }
            if raw {
                request = request.raw();
            }
            run_fetch(request, output, &client).await;
        }
        Some(Commands::Render { file, base_url }) => {
            run_render(file, &base_url);
        }
        None => {
            eprintln!("Usage: mdbrowse fetch <URL>");
            eprintln!("   or: mdbrowse render [FILE] --base-url <URL>");
            eprintln!("   or: mdbrowse mcp");
            eprintln!("   or: mdbrowse --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr so stdout carries only documents and JSON-RPC
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_fetch(request: BrowseRequest, output: OutputFormat, client: &ClientArgs) {
    let tool = client.build_tool();
    let page = tool.browse(request).await;

    match format_page(&page, output) {
        Ok(text) => writeln_safe(&text),
        Err(e) => {
            eprintln!("Error serializing response: {}", e);
            std::process::exit(1);
        }
    }

    if page.is_error() {
        std::process::exit(1);
    }
}

fn run_render(file: Option<PathBuf>, base_url: &str) {
    let markdown = match read_input(file.as_ref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            std::process::exit(1);
        }
    };
    writeln_safe(&render_page(&markdown, base_url));
}

fn read_input(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Format a page for the chosen output
fn format_page(page: &PageContent, output: OutputFormat) -> Result<String, serde_json::Error> {
    match output {
        OutputFormat::Md => Ok(format_md_with_frontmatter(page)),
        OutputFormat::Json => serde_json::to_string_pretty(page),
        OutputFormat::Html => Ok(render_page(&page.markdown, &page.url)),
    }
}

/// Format page as Markdown with YAML frontmatter
fn format_md_with_frontmatter(page: &PageContent) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    if !page.url.is_empty() {
        output.push_str(&format!("url: {}\n", page.url));
    }
    output.push_str(&format!("title: {}\n", page.title));
    output.push_str(&format!("was_markdown: {}\n", page.was_markdown));
    output.push_str("---\n");

    output.push_str(&page.markdown);
    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdbrowse::{parse_frontmatter, BrowseError, FrontmatterValue};

    fn sample_page() -> PageContent {
        PageContent {
            url: "https://example.com/docs/".to_string(),
            markdown: "# Hello World\n\nSee [next](next.html).".to_string(),
            raw_html: String::new(),
            title: "Hello World".to_string(),
            was_markdown: true,
            error: None,
        }
    }

    #[test]
    fn test_format_md_basic() {
        let output = format_md_with_frontmatter(&sample_page());

        assert!(output.starts_with("---\n"));
        assert!(output.contains("url: https://example.com/docs/\n"));
        assert!(output.contains("title: Hello World\n"));
        assert!(output.contains("was_markdown: true\n"));
        assert!(output.contains("---\n# Hello World"));
    }

    #[test]
    fn test_format_md_frontmatter_parses_back() {
        let output = format_md_with_frontmatter(&sample_page());
        let parsed = parse_frontmatter(&output);
        let fm = parsed.frontmatter.unwrap();

        assert_eq!(
            fm.get("url"),
            Some(&FrontmatterValue::Text("https://example.com/docs/".to_string()))
        );
        assert_eq!(
            fm.get("title").and_then(FrontmatterValue::as_str),
            Some("Hello World")
        );
        assert!(parsed.content.starts_with("# Hello World"));
    }

    #[test]
    fn test_format_md_error_document() {
        let page = PageContent::from_error(&BrowseError::MissingUrl);
        let output = format_md_with_frontmatter(&page);

        assert!(!output.contains("url:"));
        assert!(output.contains("title: Error\n"));
        assert!(output.ends_with("**Error:** URL is required"));
    }

    #[test]
    fn test_format_json() {
        let output = format_page(&sample_page(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["title"], "Hello World");
        assert_eq!(value["wasMarkdown"], true);
        assert_eq!(value["rawHtml"], "");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_format_html_resolves_links() {
        let output = format_page(&sample_page(), OutputFormat::Html).unwrap();

        assert!(output.contains("<h1>Hello World</h1>"));
        assert!(output.contains(r#"href="https://example.com/docs/next.html""#));
    }

    #[test]
    fn test_cli_parses_fetch_flags() {
        let cli = Cli::try_parse_from([
            "mdbrowse",
            "fetch",
            "https://example.com",
            "--raw",
            "--no-accept-md",
            "--timeout",
            "10",
            "-o",
            "json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Fetch {
                url,
                output,
                no_accept_md,
                raw,
                client,
            }) => {
                assert_eq!(url, "https://example.com");
                assert_eq!(output, OutputFormat::Json);
                assert!(no_accept_md);
                assert!(raw);
                assert_eq!(client.timeout, Some(10));
                assert!(client.user_agent.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "mdbrowse",
            "render",
            "README.md",
            "--base-url",
            "https://example.com/",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Render { file, base_url }) => {
                assert_eq!(file, Some(PathBuf::from("README.md")));
                assert_eq!(base_url, "https://example.com/");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_client_args_build_tool() {
        let args = ClientArgs {
            user_agent: Some("Agent/1".to_string()),
            timeout: Some(5),
        };
        let tool = args.build_tool();

        assert_eq!(tool.options().user_agent.as_deref(), Some("Agent/1"));
        assert_eq!(tool.options().timeout, Some(Duration::from_secs(5)));
    }
}
