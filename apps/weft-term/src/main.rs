//! Terminal shell: loads a markup document and drives the render pipeline
//! from a keypress loop. Tab walks the focus chain, Enter clicks the focused
//! node, `q` or Ctrl-C exits.

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use std::io::{Write, stdout};
use weft_dom::Document;
use weft_js::ScriptSandbox;
use weft_markup::parse_markup;
use weft_pipeline::Pipeline;

#[derive(Debug)]
struct Options {
    path: String,
    width: u32,
    height: u32,
    once: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("usage: weft-term [--width N] [--height N] [--once] <document>");
            eprintln!("weft startup error: {message}");
            std::process::exit(2);
        }
    };

    if let Err(error) = run(&options) {
        eprintln!("weft error: {error}");
        std::process::exit(1);
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut path = None;
    let mut width = 30_u32;
    let mut height = 30_u32;
    let mut once = false;

    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--once" => once = true,
            "--width" => width = parse_dimension(args.next())?,
            "--height" => height = parse_dimension(args.next())?,
            _ if arg.starts_with("--") => return Err(format!("unknown flag {arg}")),
            _ => path = Some(arg),
        }
    }

    Ok(Options {
        path: path.ok_or("missing document path")?,
        width,
        height,
        once,
    })
}

fn parse_dimension(value: Option<String>) -> Result<u32, String> {
    let value = value.ok_or("missing dimension value")?;
    value
        .parse::<u32>()
        .map_err(|_| format!("invalid dimension `{value}`"))
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(&options.path)?;
    let doc = Document::from_descriptors(&parse_markup(&source))?;

    let mut pipeline = Pipeline::new(options.width, options.height);
    pipeline.set_root(doc);
    pipeline.schedule()?;

    if options.once {
        if let Some(frame) = pipeline.run_pending() {
            println!("{frame}");
        }
        return Ok(());
    }

    interactive_loop(&mut pipeline)
}

fn interactive_loop(pipeline: &mut Pipeline) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, Hide)?;

    let result = event_loop(pipeline);

    // Restore the terminal even when the loop failed.
    let restore = execute!(stdout(), LeaveAlternateScreen, Show);
    let raw = disable_raw_mode();
    result?;
    restore?;
    raw?;
    Ok(())
}

fn event_loop(pipeline: &mut Pipeline) -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = ScriptSandbox::default();

    if let Some(frame) = pipeline.run_pending() {
        draw(&frame)?;
    }

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if is_exit_key(&key) {
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => {
                if let Some(doc) = pipeline.document_mut() {
                    doc.advance_focus();
                }
                pipeline.schedule()?;
            }
            KeyCode::Enter => {
                if let Some(doc) = pipeline.document_mut() {
                    if let Some(active) = doc.active {
                        if let Some(error) =
                            sandbox.dispatch_click(doc, active, r#"{"type":"click"}"#)
                        {
                            tracing::debug!(
                                origin = error.origin,
                                message = error.message,
                                "click handler failed"
                            );
                        }
                        pipeline.schedule()?;
                    }
                }
            }
            _ => {}
        }

        // One coalesced run per turn of the loop.
        if let Some(frame) = pipeline.run_pending() {
            draw(&frame)?;
        }
    }
}

fn is_exit_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn draw(frame: &str) -> Result<(), std::io::Error> {
    let mut out = stdout();
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in frame.split('\n').enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }
    out.flush()
}
