use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal, Write};

/// Line-oriented interactive surface. `None` means the input is closed.
///
/// Answers come back as typed, minus the line terminator.
pub trait Console {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Like `read_line`, but the answer is not echoed where the surface allows it.
    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.read_line(prompt)
    }

    fn print(&mut self, text: &str) -> io::Result<()>;
}

/// Console over any reader/writer pair; drives the app from scripts and pipes.
pub struct LineConsole<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        LineConsole { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut input = String::new();
        if self.reader.read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", text)
    }
}

/// Stdin/stdout console with a masked password prompt on a real terminal.
pub struct TerminalConsole {
    inner: LineConsole<io::StdinLock<'static>, io::Stdout>,
}

impl TerminalConsole {
    pub fn new() -> Self {
        TerminalConsole {
            inner: LineConsole::new(io::stdin().lock(), io::stdout()),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.inner.read_line(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !io::stdin().is_terminal() {
            return self.inner.read_line(prompt);
        }

        let out = &mut self.inner.writer;
        write!(out, "{}", prompt)?;
        out.flush()?;

        terminal::enable_raw_mode()?;
        let secret = read_masked(&mut *out);
        terminal::disable_raw_mode()?;
        writeln!(out)?;
        secret
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.inner.print(text)
    }
}

fn read_masked(out: &mut impl Write) -> io::Result<Option<String>> {
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c' | 'd') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None)
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(out, "\x08 \x08")?;
                    out.flush()?;
                }
            }
            KeyCode::Char(c) => {
                secret.push(c);
                write!(out, "*")?;
                out.flush()?;
            }
            _ => {}
        }
    }
}

/// Re-prompts until the answer is an integer no lower than `min`.
pub fn prompt_integer<C: Console + ?Sized>(
    console: &mut C,
    label: &str,
    min: i64,
) -> io::Result<Option<i64>> {
    loop {
        let Some(input) = console.read_line(&format!("{}: ", label))? else {
            return Ok(None);
        };
        match input.trim().parse::<i64>() {
            Ok(num) if num >= min => return Ok(Some(num)),
            Ok(_) => console.print(&format!("Please enter a value of at least {}", min))?,
            Err(_) => console.print("Please enter a whole number")?,
        }
    }
}

/// Re-prompts until the answer is a finite number no lower than `min`.
/// The value is kept as entered; `step` only shows in the prompt.
pub fn prompt_decimal<C: Console + ?Sized>(
    console: &mut C,
    label: &str,
    min: f64,
    step: f64,
) -> io::Result<Option<f64>> {
    loop {
        let Some(input) = console.read_line(&format!("{} (step {}): ", label, step))? else {
            return Ok(None);
        };
        match input.trim().parse::<f64>() {
            Ok(num) if num.is_finite() && num >= min => return Ok(Some(num)),
            Ok(num) if num.is_finite() => {
                console.print(&format!("Please enter a value of at least {:.1}", min))?
            }
            _ => console.print("Please enter a valid number")?,
        }
    }
}

/// Presents a numbered choice list; accepts the number or the exact text.
pub fn prompt_choice<C: Console + ?Sized>(
    console: &mut C,
    label: &str,
    choices: &[String],
) -> io::Result<Option<String>> {
    console.print(&format!("{}:", label))?;
    for (i, choice) in choices.iter().enumerate() {
        console.print(&format!("  {}) {}", i + 1, choice))?;
    }
    loop {
        let Some(input) = console.read_line("Select: ")? else {
            return Ok(None);
        };
        let input = input.trim();
        if let Some(choice) = choices.iter().find(|c| c.as_str() == input) {
            return Ok(Some(choice.clone()));
        }
        match input.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Ok(Some(choices[n - 1].clone())),
            _ => console.print(&format!("Please pick 1-{}", choices.len()))?,
        }
    }
}
