//! Menu input parsing shared by every prompt of the game.

use std::io::{self, BufRead, Write};

/// One line of user input, interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// A non-negative integer. Range checks are the caller's job.
    Number(u64),
    Exit,
    Help,
    Invalid,
}

pub fn parse_choice(line: &str) -> MenuChoice {
    let t = line.trim();
    if t.eq_ignore_ascii_case("x") {
        return MenuChoice::Exit;
    }
    if t == "?" {
        return MenuChoice::Help;
    }
    match t.parse::<u64>() {
        Ok(n) => MenuChoice::Number(n),
        Err(_) => MenuChoice::Invalid,
    }
}

/// Print `label`, then read one line. `None` on end of input.
pub fn ask<I: BufRead, O: Write>(input: &mut I, out: &mut O, label: &str) -> io::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// `i - label` lines followed by the exit and help entries.
pub fn write_menu<O: Write, S: AsRef<str>>(out: &mut O, items: &[S]) -> io::Result<()> {
    for (i, item) in items.iter().enumerate() {
        writeln!(out, "{i} - {}", item.as_ref())?;
    }
    writeln!(out, "X - exit")?;
    writeln!(out, "? - help")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_entries() {
        assert_eq!(parse_choice("3\n"), MenuChoice::Number(3));
        assert_eq!(parse_choice("  0 "), MenuChoice::Number(0));
        assert_eq!(parse_choice("x"), MenuChoice::Exit);
        assert_eq!(parse_choice("X\r\n"), MenuChoice::Exit);
        assert_eq!(parse_choice("?"), MenuChoice::Help);
        assert_eq!(parse_choice("-1"), MenuChoice::Invalid);
        assert_eq!(parse_choice("two"), MenuChoice::Invalid);
        assert_eq!(parse_choice(""), MenuChoice::Invalid);
    }

    #[test]
    fn ask_returns_none_at_eof() {
        let mut input = io::Cursor::new(Vec::<u8>::new());
        let mut out = Vec::new();
        assert_eq!(ask(&mut input, &mut out, "Your selection: ").unwrap(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "Your selection: ");
    }

    #[test]
    fn menu_layout() {
        let mut out = Vec::new();
        write_menu(&mut out, &["0", "1"]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0 - 0\n1 - 1\nX - exit\n? - help\n"
        );
    }
}
