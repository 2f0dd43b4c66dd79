//! Print-to-assembly emitter
//!
//! Finds the first `print(...)` in the raw source, flattens its argument into
//! a plain message using the declared variable values, and embeds the message
//! in a fixed x86-64 Linux (NASM) program that writes it to stdout and exits.
//! There is no instruction selection: the program skeleton never changes.

use log::debug;

use crate::frontend::patterns::is_word_char;
use crate::frontend::symbols::DeclaredVariables;

/// Generate the assembly program for the first `print(...)` call in `source`.
///
/// Returns an empty string when the source has no `print(...)` call.
pub fn generate_assembly_print(source: &str, variables: &DeclaredVariables) -> String {
    let Some(argument) = extract_print_argument(source) else {
        debug!("no print call, nothing to emit");
        return String::new();
    };
    let message = render_message(argument, variables);
    debug!("print argument {:?} rendered as {:?}", argument, message);
    AsmGen::new().generate(&message)
}

/// Text between `print(` and the next `)` on the same line
pub fn extract_print_argument(source: &str) -> Option<&str> {
    let mut rest = source;
    while let Some(at) = rest.find("print(") {
        let after = &rest[at + "print(".len()..];
        let line_end = after.find('\n').unwrap_or(after.len());
        if let Some(close) = after[..line_end].find(')') {
            return Some(&after[..close]);
        }
        rest = after;
    }
    None
}

/// Flatten a print argument into the message text
pub fn render_message(argument: &str, variables: &DeclaredVariables) -> String {
    let unquoted = strip_quoted_runs(argument);
    let substituted = substitute_words(&unquoted, variables);
    substituted
        .chars()
        .filter(|c| !matches!(c, '+' | '\'' | '"'))
        .collect()
}

/// `'abc'` -> `abc`, for both quote styles
fn strip_quoted_runs(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' || c == '"' {
            if let Some(len) = chars[i + 1..].iter().position(|&q| q == c) {
                out.extend(&chars[i + 1..i + 1 + len]);
                i += len + 2;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Replace every word that names a declared variable with its value
fn substitute_words(text: &str, variables: &DeclaredVariables) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for c in text.chars() {
        if is_word_char(c) {
            word.push(c);
            continue;
        }
        flush_word(&mut out, &mut word, variables);
        out.push(c);
    }
    flush_word(&mut out, &mut word, variables);
    out
}

fn flush_word(out: &mut String, word: &mut String, variables: &DeclaredVariables) {
    if word.is_empty() {
        return;
    }
    match variables.get(word.as_str()) {
        Some(value) => out.push_str(value),
        None => out.push_str(word),
    }
    word.clear();
}

/// Assembly text writer
struct AsmGen {
    output: String,
    indent: usize,
}

impl AsmGen {
    fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Write indented line
    fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn blank(&mut self) {
        self.output.push('\n');
    }

    fn generate(mut self, message: &str) -> String {
        self.writeln("section .data");
        self.indent = 1;
        self.writeln(&format!("msg db '{}', 0xA", message));
        self.writeln("len equ $ - msg");
        self.indent = 0;
        self.blank();

        self.writeln("section .text");
        self.indent = 1;
        self.writeln("global _start");
        self.indent = 0;
        self.blank();

        self.writeln("_start:");
        self.indent = 1;
        self.writeln("mov rax, 1");
        self.writeln("mov rdi, 1");
        self.writeln("mov rsi, msg");
        self.writeln("mov rdx, len");
        self.writeln("syscall");
        self.blank();
        self.writeln("mov rax, 60");
        self.writeln("xor rdi, rdi");
        self.writeln("syscall");

        self.output
    }
}
