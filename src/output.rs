//! User-facing console lines, separate from tracing logs.
//! Labels are colored only when the target stream is a TTY.

use owo_colors::OwoColorize;

#[derive(Clone, Copy)]
enum Stream {
    Out,
    Err,
}

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Warn,
    Error,
    Ok,
}

fn is_tty(stream: Stream) -> bool {
    match stream {
        Stream::Out => atty::is(atty::Stream::Stdout),
        Stream::Err => atty::is(atty::Stream::Stderr),
    }
}

fn label(tone: Tone, color: bool) -> String {
    let text = match tone {
        Tone::Info => "info:",
        Tone::Warn => "warn:",
        Tone::Error => "error:",
        Tone::Ok => "ok:",
    };
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Info => text.cyan().bold().to_string(),
        Tone::Warn => text.yellow().bold().to_string(),
        Tone::Error => text.red().bold().to_string(),
        Tone::Ok => text.green().bold().to_string(),
    }
}

fn emit(stream: Stream, tone: Tone, msg: &str) {
    let line = format!("{} {}", label(tone, is_tty(stream)), msg);
    match stream {
        Stream::Out => println!("{line}"),
        Stream::Err => eprintln!("{line}"),
    }
}

pub fn print_info(msg: &str) {
    emit(Stream::Out, Tone::Info, msg);
}

pub fn print_warn(msg: &str) {
    emit(Stream::Err, Tone::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Stream::Err, Tone::Error, msg);
}

pub fn print_success(msg: &str) {
    emit(Stream::Out, Tone::Ok, msg);
}

/// Plain line on stdout (no prefix), for output users may script against.
pub fn print_user(msg: &str) {
    println!("{msg}");
}
