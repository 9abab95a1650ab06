//! Two-stack evaluation of parsed formulas.
//!
//! Tokens are scanned left to right with an operand stack and an operator
//! stack. `*` and `/` bind as soon as their right operand is known, `+` and
//! `-` wait until the next additive operator, closing paren or end of input.
//! Every step returns a `Result`, so a failure is just a [`FormulaError`] value.

use super::error::FormulaError;
use super::formula::{Formula, Operator, Token};

/// A pending entry on the operator stack.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Pending {
    Op(Operator),
    Open,
}

struct Stacks {
    values: Vec<f64>,
    ops: Vec<Pending>,
}

impl Stacks {
    fn pop_value(&mut self) -> Result<f64, FormulaError> {
        self.values.pop().ok_or(FormulaError::Malformed)
    }

    /// Pop the top operator if `wanted` accepts it.
    fn pop_op_if(&mut self, wanted: fn(Operator) -> bool) -> Option<Operator> {
        match self.ops.last() {
            Some(Pending::Op(op)) if wanted(*op) => {
                let op = *op;
                self.ops.pop();
                Some(op)
            }
            _ => None,
        }
    }

    /// Apply `op` to the top two operands and push the result.
    fn reduce(&mut self, op: Operator) -> Result<(), FormulaError> {
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        self.values.push(apply(op, left, right)?);
        Ok(())
    }

    /// Push an operand, first resolving a pending `*` or `/` against it.
    fn push_operand(&mut self, value: f64) -> Result<(), FormulaError> {
        match self.pop_op_if(Operator::is_multiplicative) {
            Some(op) => {
                let left = self.pop_value()?;
                self.values.push(apply(op, left, value)?);
            }
            None => self.values.push(value),
        }
        Ok(())
    }

    fn close_paren(&mut self) -> Result<(), FormulaError> {
        if let Some(op) = self.pop_op_if(Operator::is_additive) {
            self.reduce(op)?;
        }
        match self.ops.pop() {
            Some(Pending::Open) => {}
            _ => return Err(FormulaError::Malformed),
        }
        if let Some(op) = self.pop_op_if(Operator::is_multiplicative) {
            self.reduce(op)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<f64, FormulaError> {
        match self.ops.pop() {
            Some(Pending::Op(op)) => self.reduce(op)?,
            Some(Pending::Open) => return Err(FormulaError::Malformed),
            None => {}
        }
        match (self.values.pop(), self.values.is_empty(), self.ops.is_empty()) {
            (Some(result), true, true) => Ok(result),
            _ => Err(FormulaError::Malformed),
        }
    }
}

fn apply(op: Operator, left: f64, right: f64) -> Result<f64, FormulaError> {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Sub => Ok(left - right),
        Operator::Mul => Ok(left * right),
        Operator::Div if right == 0.0 => Err(FormulaError::DivisionByZero),
        Operator::Div => Ok(left / right),
    }
}

impl Formula {
    /// Evaluate the formula, resolving each variable through `lookup`.
    ///
    /// `lookup` returns `None` for a variable it cannot turn into a number;
    /// evaluation then stops with [`FormulaError::UnresolvedVariable`].
    pub fn evaluate<F>(&self, mut lookup: F) -> Result<f64, FormulaError>
    where
        F: FnMut(&str) -> Option<f64>,
    {
        let mut stacks = Stacks {
            values: Vec::new(),
            ops: Vec::new(),
        };

        for token in &self.tokens {
            match token {
                Token::Number(n) => stacks.push_operand(*n)?,
                Token::Variable(name) => {
                    let value =
                        lookup(name).ok_or_else(|| FormulaError::UnresolvedVariable(name.clone()))?;
                    stacks.push_operand(value)?;
                }
                Token::LParen => stacks.ops.push(Pending::Open),
                Token::Op(op) if op.is_multiplicative() => stacks.ops.push(Pending::Op(*op)),
                Token::Op(op) => {
                    if let Some(pending) = stacks.pop_op_if(Operator::is_additive) {
                        stacks.reduce(pending)?;
                    }
                    stacks.ops.push(Pending::Op(*op));
                }
                Token::RParen => stacks.close_paren()?,
            }
        }

        stacks.finish()
    }
}
