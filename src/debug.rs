use crate::{Grammar, key, rule::Rule, symbol::Symbol};
use display_tree::{AsTree, DisplayTree, Style};
use std::{
    fmt::{Formatter, Write},
    iter::once,
};

const EMPTY_STRING: &str = "";

impl DisplayTree for Symbol {
    fn fmt(&self, f: &mut Formatter, style: Style) -> std::fmt::Result {
        let indentation = style.indentation as usize - 1;
        let horizontal_bar = format!("{:indentation$}", style.char_set.horizontal);

        writeln!(f, "{}", style.leaf_style.apply(self.name()))?;
        write!(
            f,
            "{}",
            style.branch_style.apply(&format!(
                "{}{horizontal_bar} {}, precedence {}, key {}",
                style.char_set.end_connector,
                self.role(),
                self.precedence(),
                self.key()
            ))
        )
    }
}

impl<V, E> DisplayTree for Rule<V, E> {
    fn fmt(&self, f: &mut Formatter, style: Style) -> std::fmt::Result {
        let indentation = style.indentation as usize - 1;
        let horizontal_bar = format!("{:indentation$}", style.char_set.horizontal);
        let ordinals: Vec<String> = key::split(self.key())
            .map(|o| o.map_or_else(|e| e.to_string(), |o| o.to_string()))
            .collect();

        writeln!(f, "{}", style.leaf_style.apply("Rule"))?;
        writeln!(
            f,
            "{}{horizontal_bar}pattern: {}",
            style.char_set.connector,
            self.pattern()
        )?;
        writeln!(
            f,
            "{}{horizontal_bar}precedence: {}",
            style.char_set.connector,
            self.precedence()
        )?;
        write!(
            f,
            "{}{horizontal_bar}symbols: [{}]",
            style.char_set.end_connector,
            ordinals.join(", ")
        )
    }
}

impl<V, E> DisplayTree for Grammar<V, E> {
    fn fmt(&self, f: &mut Formatter, style: Style) -> std::fmt::Result {
        let indentation = style.indentation as usize - 1;
        let horizontal_bar = format!("{:indentation$}", style.char_set.horizontal);
        let spacer = format!(" {EMPTY_STRING:indentation$}");
        let vertical = format!("{}{EMPTY_STRING:indentation$}", style.char_set.vertical);

        let symbols: Vec<&Symbol> = self.symbols().iter().map(|s| &**s).collect();
        let rules: Vec<&Rule<V, E>> = self.rules().iter().collect();
        let mut body = String::new();

        writeln!(f, "{}", style.leaf_style.apply("Grammar"))?;
        writeln!(
            f,
            "{}{horizontal_bar}symbols: {}",
            style.char_set.connector,
            symbols.len()
        )?;
        print_vec_tree(&mut body, style, &symbols)?;
        for line in body.lines() {
            writeln!(f, "{}{line}", style.branch_style.apply(&vertical))?;
        }

        writeln!(
            f,
            "{}{horizontal_bar}rules: {}",
            style.char_set.end_connector,
            rules.len()
        )?;
        body.clear();
        print_vec_tree(&mut body, style, &rules)?;
        for line in body.lines() {
            writeln!(f, "{spacer}{line}")?;
        }
        Ok(())
    }
}

pub(crate) fn print_vec_tree<T: DisplayTree>(
    f: &mut impl Write,
    style: Style,
    body: &[&T],
) -> Result<(), std::fmt::Error> {
    let indentation = style.indentation as usize - 1;
    let spacer = format!(" {EMPTY_STRING:indentation$}");
    let horizontal_bar = format!("{:indentation$}", style.char_set.horizontal);
    let vec_output = fmt_vec(body, style);

    for (block_no, block) in vec_output.enumerate() {
        for (n, line) in block.lines().enumerate() {
            if n == 0 && block_no == 0 {
                write!(f, "{}{horizontal_bar}", style.char_set.end_connector)?;
            } else {
                write!(f, "{spacer}")?;
            }
            writeln!(f, "{line}")?;
        }
    }
    Ok(())
}

pub(crate) fn fmt_vec<'a, T: DisplayTree>(
    v: &'a [&'a T],
    style: Style,
) -> impl Iterator<Item = String> + 'a {
    let max_index = v.len().saturating_sub(1);
    let num_width = format!("{max_index}").len();

    let vertical = style
        .branch_style
        .apply(&style.char_set.vertical.to_string());

    v.iter().enumerate().map(move |(n, item)| {
        let continued_vertical = if n < max_index { vertical.as_str() } else { " " };

        let indent = format!(" {:num_width$}", "");
        let tree = AsTree::with_style(*item, style).to_string();
        let mut tree_lines = tree.lines().enumerate().map(|(line_num, line)| {
            let line = style.leaf_style.apply(line);
            if line_num > 0 {
                format!("{continued_vertical}{indent}{line}\n")
            } else {
                format!("{line}\n")
            }
        });
        let lead_line = tree_lines.next().unwrap_or_default();

        let lead = format!("{n:<0num_width$}: {lead_line}");

        once(lead).chain(tree_lines).collect()
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Token, symbol::Symbols};

    fn grammar() -> Grammar<(), ()> {
        Grammar::builder()
            .input_output("number")
            .leaf_with_precedence("+", 1)
            .rule("number + number", |_: &Symbols, mut t: Vec<Token<()>>| {
                t.pop().ok_or(())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn symbol_tree() {
        let grammar = grammar();
        let plus = grammar.symbols().by_name("+").unwrap();
        let tree = AsTree::new(&**plus).to_string();
        assert!(tree.starts_with('+'), "{tree}");
        assert!(tree.contains("leaf, precedence 1, key 01"), "{tree}");
    }

    #[test]
    fn grammar_tree() {
        let grammar = grammar();
        let tree = AsTree::new(&grammar).to_string();

        assert!(tree.starts_with("Grammar"), "{tree}");
        assert!(tree.contains("symbols: 2"), "{tree}");
        assert!(tree.contains("input-output, precedence 0, key 00"), "{tree}");
        assert!(tree.contains("rules: 1"), "{tree}");
        assert!(tree.contains("pattern: number + number"), "{tree}");
        assert!(tree.contains("precedence: 1"), "{tree}");
        assert!(tree.contains("symbols: [0, 1, 0]"), "{tree}");
    }

    #[test]
    fn empty_list() {
        let mut out = String::new();
        print_vec_tree::<Symbol>(&mut out, Style::default(), &[]).unwrap();
        assert!(out.is_empty());
    }
}
