//! Recursive-descent parser for the equation grammar.
//!
//! Precedence, lowest first: comparison, `+ -`, `* / // %`, unary `- +`,
//! `**` (right associative), attribute access and calls, primaries.

use crate::ast::{BinaryOp, CompareOp, Expr, UnaryOp};
use crate::error::EvaluationError;
use crate::limits::EvalLimits;

pub fn parse(source: &str, limits: &EvalLimits) -> Result<Expr, EvaluationError> {
    if source.chars().count() > limits.max_source_len {
        return Err(EvaluationError::TooLong {
            limit: limits.max_source_len,
        });
    }
    let mut parser = Parser::new(source, limits.max_depth);
    parser.parse().map_err(|err| match err {
        EvaluationError::Syntax { position, message } => EvaluationError::Syntax {
            position: char_index(source, position),
            message,
        },
        other => other,
    })
}

/// The parser tracks byte offsets; errors report character positions.
fn char_index(source: &str, byte_offset: usize) -> usize {
    source
        .get(..byte_offset)
        .map_or(byte_offset, |prefix| prefix.chars().count())
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, max_depth: usize) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    fn parse(&mut self) -> Result<Expr, EvaluationError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(EvaluationError::syntax(self.pos, "empty expression"));
        }
        let expr = self.parse_comparison()?;
        self.skip_whitespace();
        match self.peek() {
            None => Ok(expr),
            Some(c) => Err(EvaluationError::syntax(
                self.pos,
                format!("unexpected character '{c}'"),
            )),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn check_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    // Depth is charged once per tree level built, so it bounds the height of
    // the resulting tree and therefore the recursion of the evaluator.
    fn enter(&mut self) -> Result<(), EvaluationError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(EvaluationError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn compare_op(&self) -> Option<(CompareOp, usize)> {
        const OPERATORS: [(&str, CompareOp); 6] = [
            ("<=", CompareOp::Le),
            (">=", CompareOp::Ge),
            ("==", CompareOp::Eq),
            ("!=", CompareOp::Ne),
            ("<", CompareOp::Lt),
            (">", CompareOp::Gt),
        ];
        OPERATORS
            .iter()
            .find(|(symbol, _)| self.check_str(symbol))
            .map(|(symbol, op)| (*op, symbol.len()))
    }

    fn parse_comparison(&mut self) -> Result<Expr, EvaluationError> {
        let left = self.parse_additive()?;
        self.skip_whitespace();
        let Some((op, width)) = self.compare_op() else {
            return Ok(left);
        };
        self.pos += width;
        self.enter()?;
        let right = self.parse_additive()?;
        self.leave(1);
        self.skip_whitespace();
        if self.compare_op().is_some() {
            return Err(EvaluationError::syntax(
                self.pos,
                "chained comparisons are not supported",
            ));
        }
        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, EvaluationError> {
        let mut left = self.parse_term()?;
        let mut levels = 0;

        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('+') => BinaryOp::Add,
                Some('-') => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.enter()?;
            levels += 1;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.leave(levels);
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, EvaluationError> {
        let mut left = self.parse_unary()?;
        let mut levels = 0;

        loop {
            self.skip_whitespace();
            let op = if self.check_str("//") {
                self.pos += 2;
                BinaryOp::FloorDiv
            } else {
                match self.peek() {
                    Some('*') => BinaryOp::Mul,
                    Some('/') => BinaryOp::Div,
                    Some('%') => BinaryOp::Mod,
                    _ => break,
                }
            };
            if op != BinaryOp::FloorDiv {
                self.advance();
            }
            self.enter()?;
            levels += 1;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.leave(levels);
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvaluationError> {
        self.skip_whitespace();
        let op = match self.peek() {
            Some('-') => UnaryOp::Neg,
            Some('+') => UnaryOp::Pos,
            _ => return self.parse_power(),
        };
        self.advance();
        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave(1);
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, EvaluationError> {
        let base = self.parse_postfix()?;
        self.skip_whitespace();
        if !self.check_str("**") {
            return Ok(base);
        }
        self.pos += 2;
        self.enter()?;
        // The exponent may carry its own sign: `2 ** -1`.
        let exponent = self.parse_unary()?;
        self.leave(1);
        Ok(Expr::Binary {
            op: BinaryOp::Pow,
            left: Box::new(base),
            right: Box::new(exponent),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, EvaluationError> {
        let mut expr = self.parse_primary()?;
        let mut levels = 0;

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('.') => {
                    self.advance();
                    self.skip_whitespace();
                    let name = self.parse_identifier()?;
                    self.enter()?;
                    levels += 1;
                    expr = Expr::Attribute {
                        object: Box::new(expr),
                        name,
                    };
                }
                Some('(') => {
                    self.advance();
                    self.enter()?;
                    levels += 1;
                    let args = self.parse_arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                _ => break,
            }
        }

        self.leave(levels);
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, EvaluationError> {
        self.skip_whitespace();

        match self.peek() {
            Some('(') => {
                let open = self.pos;
                self.advance();
                self.enter()?;
                let expr = self.parse_comparison()?;
                self.skip_whitespace();
                if self.peek() != Some(')') {
                    return Err(EvaluationError::syntax(open, "unclosed '('"));
                }
                self.advance();
                self.leave(1);
                Ok(expr)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                Ok(Expr::Variable(self.parse_identifier()?))
            }
            Some(c) => Err(EvaluationError::syntax(
                self.pos,
                format!("unexpected character '{c}'"),
            )),
            None => Err(EvaluationError::syntax(
                self.pos,
                "unexpected end of expression",
            )),
        }
    }

    fn parse_number(&mut self) -> Result<Expr, EvaluationError> {
        let start = self.pos;
        let mut has_dot = false;
        let mut has_exp = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !has_dot && !has_exp {
                has_dot = true;
                self.advance();
            } else if (c == 'e' || c == 'E') && !has_exp {
                has_exp = true;
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
            } else {
                break;
            }
        }

        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Expr::Number)
            .map_err(|_| EvaluationError::syntax(start, format!("invalid number '{text}'")))
    }

    fn parse_identifier(&mut self) -> Result<String, EvaluationError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.advance(),
            _ => return Err(EvaluationError::syntax(start, "expected identifier")),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, EvaluationError> {
        let mut args = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_comparison()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                    self.skip_whitespace();
                    if self.peek() == Some(')') {
                        self.advance();
                        break;
                    }
                }
                Some(')') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    return Err(EvaluationError::syntax(
                        self.pos,
                        format!("expected ',' or ')' in call arguments, found '{c}'"),
                    ))
                }
                None => {
                    return Err(EvaluationError::syntax(
                        self.pos,
                        "unclosed call argument list",
                    ))
                }
            }
        }

        Ok(args)
    }
}
