//! Rendering of Macaulay2 programs.
//!
//! [`ScriptEmitter`] appends statements in call order and never reorders, so
//! identical call sequences produce byte-identical text.

use std::fmt::{self, Display, Write};

/// A finished Macaulay2 program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolicScript(String);

impl SymbolicScript {
    /// Program text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the program text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for SymbolicScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SymbolicScript {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Incremental builder of Macaulay2 source.
#[derive(Debug, Default)]
pub struct ScriptEmitter {
    buf: String,
}

fn join<I, T>(items: I, sep: &str) -> String
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        // writing into a String cannot fail
        let _ = write!(out, "{}", item);
    }
    out
}

impl ScriptEmitter {
    /// Empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// `-- text`
    pub fn comment(&mut self, text: impl Display) -> &mut Self {
        let _ = writeln!(self.buf, "-- {}", text);
        self
    }

    /// Empty line
    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// `name = expr`
    pub fn assign(&mut self, name: &str, expr: impl Display) -> &mut Self {
        let _ = writeln!(self.buf, "{} = {}", name, expr);
        self
    }

    /// `kk = field` and `R = kk[vars]`
    pub fn ring<I, T>(&mut self, field: impl Display, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.assign("kk", field);
        let _ = writeln!(self.buf, "R = kk[{}]", join(vars, ", "));
        self
    }

    /// `name = ideal(` with one generator per line, or `ideal(0)` when empty
    pub fn ideal<I, T>(&mut self, name: &str, generators: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let body = join(generators.into_iter().map(|g| format!("    {}", g)), ",\n");
        if body.is_empty() {
            let _ = writeln!(self.buf, "{} = ideal(0)", name);
        } else {
            let _ = writeln!(self.buf, "{} = ideal(\n{}\n)", name, body);
        }
        self
    }

    /// `name = matrix{` with one `{...}` row per line
    pub fn matrix<R, I, T>(&mut self, name: &str, rows: R) -> &mut Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let rows = join(rows.into_iter().map(|row| format!("{{{}}}", join(row, ", "))), ",\n    ");
        let _ = writeln!(self.buf, "{} = matrix{{\n    {}\n}}", name, rows);
        self
    }

    /// Single-row matrix `name = matrix{{ e1, e2, ... }}`
    pub fn row_matrix<I, T>(&mut self, name: &str, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let _ = writeln!(self.buf, "{} = matrix{{{{ {} }}}}", name, join(entries, ", "));
        self
    }

    /// `name = {a, b, ...}`
    pub fn list<I, T>(&mut self, name: &str, items: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let _ = writeln!(self.buf, "{} = {{{}}}", name, join(items, ", "));
        self
    }

    /// `name = minors(k, M1) + minors(k, M2) + ...`
    pub fn minors_sum<I, T>(&mut self, name: &str, size: usize, matrices: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let terms = join(
            matrices.into_iter().map(|m| format!("minors({}, {})", size, m)),
            " + ",
        );
        if terms.is_empty() {
            self.assign(name, "ideal(0)")
        } else {
            self.assign(name, terms)
        }
    }

    /// `target = eliminate(vars, ideal)`
    pub fn eliminate(&mut self, target: &str, vars: &str, ideal: &str) -> &mut Self {
        let _ = writeln!(self.buf, "{} = eliminate({}, {})", target, vars, ideal);
        self
    }

    /// `print "text"`
    pub fn print_text(&mut self, text: impl Display) -> &mut Self {
        let _ = writeln!(self.buf, "print \"{}\"", text);
        self
    }

    /// `print expr`
    pub fn print_expr(&mut self, expr: impl Display) -> &mut Self {
        let _ = writeln!(self.buf, "print {}", expr);
        self
    }

    /// Freeze into a script
    pub fn finish(self) -> SymbolicScript {
        SymbolicScript(self.buf)
    }
}
