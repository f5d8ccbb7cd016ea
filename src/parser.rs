use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};
use std::mem;

/// Binding strength for precedence climbing, lowest to highest. Binary
/// operators parse their right operand at their own level, which makes
/// every one of them left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    fn of(kind: TokenType) -> Precedence {
        match kind {
            TokenType::Eq | TokenType::NotEq => Precedence::Equals,
            TokenType::Lt | TokenType::Gt => Precedence::LessGreater,
            TokenType::Plus | TokenType::Minus => Precedence::Sum,
            TokenType::Slash | TokenType::Asterisk => Precedence::Product,
            TokenType::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// Pratt parser with one token of lookahead. Never fail-fast: a statement
/// that does not parse yields no node, records a diagnostic, and parsing
/// resumes at the next statement boundary, so a single pass reports every
/// syntax error in the input.
pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Parser {
        let mut parser = Parser {
            lexer,
            cur_token: Token::eof(),
            peek_token: Token::eof(),
            errors: Vec::new(),
        };
        // Prime cur_token and peek_token.
        parser.next_token();
        parser.next_token();
        parser
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.cur_token_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.next_token();
        }
        log::debug!(
            "parsed {} statements, {} errors",
            program.statements.len(),
            self.errors.len()
        );
        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        log::trace!("statement dispatch on {}", self.cur_token.kind);
        match self.cur_token.kind {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenType::Ident) {
            self.synchronize();
            return None;
        }
        let name = Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        };
        if !self.expect_peek(TokenType::Assign) {
            self.synchronize();
            return None;
        }
        self.next_token();
        let value = match self.parse_expression(Precedence::Lowest) {
            Some(value) => value,
            None => {
                self.synchronize();
                return None;
            }
        };
        if !self.expect_peek(TokenType::Semicolon) {
            self.synchronize();
            return None;
        }
        Some(Statement::Let {
            token,
            name,
            value: Some(value),
        })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        self.next_token();
        if self.cur_token_is(TokenType::Semicolon) {
            return Some(Statement::Return { token, value: None });
        }
        let value = match self.parse_expression(Precedence::Lowest) {
            Some(value) => value,
            None => {
                self.synchronize();
                return None;
            }
        };
        if !self.expect_peek(TokenType::Semicolon) {
            self.synchronize();
            return None;
        }
        Some(Statement::Return {
            token,
            value: Some(value),
        })
    }

    // The terminating semicolon is optional for expression statements, so
    // a bare trailing expression still parses.
    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token_is(TokenType::Semicolon) {
            self.next_token();
        }
        Some(Statement::Expression { token, expr })
    }

    fn parse_expression(&mut self, min_precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;
        while min_precedence < Precedence::of(self.peek_token.kind) {
            left = match self.peek_token.kind {
                TokenType::Plus
                | TokenType::Minus
                | TokenType::Slash
                | TokenType::Asterisk
                | TokenType::Eq
                | TokenType::NotEq
                | TokenType::Lt
                | TokenType::Gt => {
                    self.next_token();
                    self.parse_infix_expression(left)?
                }
                TokenType::LParen => {
                    self.next_token();
                    self.parse_call_expression(left)?
                }
                _ => break,
            };
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token.kind {
            TokenType::Ident => Some(Expression::Identifier(Identifier {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            })),
            TokenType::Int => self.parse_integer_literal(),
            TokenType::Str => Some(Expression::StringLiteral {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            }),
            TokenType::True | TokenType::False => Some(Expression::Boolean {
                token: self.cur_token.clone(),
                value: self.cur_token_is(TokenType::True),
            }),
            TokenType::Bang | TokenType::Minus => self.parse_prefix_expression(),
            TokenType::LParen => self.parse_grouped_expression(),
            TokenType::If => self.parse_if_expression(),
            TokenType::Function => self.parse_function_literal(),
            TokenType::LBrace => self.parse_hash_literal(),
            kind => {
                self.error(format!("no prefix parse function for {} found", kind));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral { token, value }),
            Err(_) => {
                self.error(format!("could not parse {:?} as integer", token.literal));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        let precedence = Precedence::of(token.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();
        let alternative = if self.peek_token_is(TokenType::Else) {
            self.next_token();
            if !self.expect_peek(TokenType::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };
        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();
        self.next_token();
        while !self.cur_token_is(TokenType::RBrace) && !self.cur_token_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        BlockStatement { token, statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::Function {
            token,
            parameters,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek_token_is(TokenType::RParen) {
            self.next_token();
            return Some(parameters);
        }
        self.next_token();
        parameters.push(self.parse_parameter_name()?);
        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            parameters.push(self.parse_parameter_name()?);
        }
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(parameters)
    }

    fn parse_parameter_name(&mut self) -> Option<Identifier> {
        if !self.cur_token_is(TokenType::Ident) {
            self.error(format!(
                "expected parameter name, got {} instead",
                self.cur_token.kind
            ));
            return None;
        }
        Some(Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        })
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let arguments = self.parse_call_arguments()?;
        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = Vec::new();
        if self.peek_token_is(TokenType::RParen) {
            self.next_token();
            return Some(arguments);
        }
        self.next_token();
        arguments.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(arguments)
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let mut pairs = Vec::new();
        while !self.peek_token_is(TokenType::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenType::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if !self.peek_token_is(TokenType::RBrace) && !self.expect_peek(TokenType::Comma) {
                return None;
            }
        }
        if !self.expect_peek(TokenType::RBrace) {
            return None;
        }
        Some(Expression::Hash { token, pairs })
    }

    fn next_token(&mut self) {
        self.cur_token = mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn cur_token_is(&self, kind: TokenType) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenType) -> bool {
        self.peek_token.kind == kind
    }

    // Advance past the expected peek token, or record a diagnostic and
    // stay put.
    fn expect_peek(&mut self, kind: TokenType) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            self.error(format!(
                "expected next token to be {}, got {} instead",
                kind, self.peek_token.kind
            ));
            false
        }
    }

    fn error(&mut self, message: String) {
        log::debug!("parse error: {}", message);
        self.errors.push(message);
    }

    // Recovery point after a failed let/return statement: skip to the
    // next semicolon (or end of input) so the following statements still
    // get their own diagnostics.
    fn synchronize(&mut self) {
        while !self.cur_token_is(TokenType::Semicolon) && !self.cur_token_is(TokenType::Eof) {
            self.next_token();
        }
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    fn parse(input: &str) -> Program {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        assert!(
            parser.errors().is_empty(),
            "parser had errors for {:?}: {:?}",
            input,
            parser.errors()
        );
        program
    }

    fn parse_single_expression(input: &str) -> Expression {
        let program = parse(input);
        assert_eq!(program.statements.len(), 1, "program: {:?}", program);
        match program.statements.into_iter().next().unwrap() {
            Statement::Expression { expr, .. } => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn let_statements() {
        let program = parse("let x = 5; let y = 10; let foobar = 838383;");
        assert_eq!(program.statements.len(), 3);

        let expected = [("x", "5"), ("y", "10"), ("foobar", "838383")];
        for (statement, (expected_name, expected_value)) in
            program.statements.iter().zip(expected.iter())
        {
            assert_eq!(statement.token_literal(), "let");
            match statement {
                Statement::Let { name, value, .. } => {
                    assert_eq!(name.value, *expected_name);
                    assert_eq!(name.token_literal(), *expected_name);
                    assert_eq!(value.as_ref().unwrap().to_string(), *expected_value);
                }
                other => panic!("expected let statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn return_statements() {
        let program = parse("return 10; return 20; return 993322;");
        assert_eq!(program.statements.len(), 3);

        let expected = ["10", "20", "993322"];
        for (statement, expected_value) in program.statements.iter().zip(expected.iter()) {
            assert_eq!(statement.token_literal(), "return");
            match statement {
                Statement::Return { value, .. } => {
                    assert_eq!(value.as_ref().unwrap().to_string(), *expected_value);
                }
                other => panic!("expected return statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn return_without_value() {
        let program = parse("return;");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Return { value, .. } => assert!(value.is_none()),
            other => panic!("expected return statement, got {:?}", other),
        }
    }

    #[test]
    fn identifier_expression() {
        match parse_single_expression("foobar;") {
            Expression::Identifier(identifier) => assert_eq!(identifier.value, "foobar"),
            other => panic!("expected identifier, got {:?}", other),
        }
    }

    #[test]
    fn integer_literal_expression() {
        match parse_single_expression("5;") {
            Expression::IntegerLiteral { value, .. } => assert_eq!(value, 5),
            other => panic!("expected integer literal, got {:?}", other),
        }
    }

    #[test]
    fn string_literal_expression() {
        match parse_single_expression("\"hello world\";") {
            Expression::StringLiteral { value, .. } => assert_eq!(value, "hello world"),
            other => panic!("expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn boolean_expressions() {
        match parse_single_expression("true;") {
            Expression::Boolean { value, .. } => assert!(value),
            other => panic!("expected boolean, got {:?}", other),
        }
        match parse_single_expression("false;") {
            Expression::Boolean { value, .. } => assert!(!value),
            other => panic!("expected boolean, got {:?}", other),
        }
    }

    #[test]
    fn prefix_expressions_render_parenthesized() {
        assert_eq!(parse_single_expression("-123;").to_string(), "(-123)");
        assert_eq!(parse_single_expression("!test;").to_string(), "(!test)");
    }

    #[test]
    fn prefix_expression_structure() {
        match parse_single_expression("-15;") {
            Expression::Prefix {
                operator, right, ..
            } => {
                assert_eq!(operator, "-");
                assert_eq!(right.to_string(), "15");
            }
            other => panic!("expected prefix expression, got {:?}", other),
        }
    }

    #[test]
    fn infix_expression_structure() {
        match parse_single_expression("5 + 6;") {
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => {
                assert_eq!(operator, "+");
                assert_eq!(left.to_string(), "5");
                assert_eq!(right.to_string(), "6");
            }
            other => panic!("expected infix expression, got {:?}", other),
        }
    }

    #[test_log::test]
    fn operator_precedence_rendering() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("-3 + 4", "((-3) + 4)"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("false", "false"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
        ];
        for (input, expected) in cases.iter() {
            assert_eq!(&parse(input).to_string(), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn if_expression() {
        match parse_single_expression("if (x < y) { x }") {
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                assert_eq!(condition.to_string(), "(x < y)");
                assert_eq!(consequence.statements.len(), 1);
                assert_eq!(consequence.to_string(), "x");
                assert!(alternative.is_none());
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn if_else_expression() {
        match parse_single_expression("if (x < y) { x } else { y }") {
            Expression::If { alternative, .. } => {
                assert_eq!(alternative.unwrap().to_string(), "y");
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn function_literal() {
        match parse_single_expression("fn(x, y) { x + y; }") {
            Expression::Function {
                parameters, body, ..
            } => {
                let names: Vec<&str> = parameters.iter().map(|p| p.value.as_str()).collect();
                assert_eq!(names, ["x", "y"]);
                assert_eq!(body.to_string(), "(x + y)");
            }
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn function_parameter_lists() {
        let cases: [(&str, &[&str]); 3] = [
            ("fn() {};", &[]),
            ("fn(x) {};", &["x"]),
            ("fn(x, y, z) {};", &["x", "y", "z"]),
        ];
        for (input, expected) in cases.iter() {
            match parse_single_expression(input) {
                Expression::Function { parameters, .. } => {
                    let names: Vec<&str> = parameters.iter().map(|p| p.value.as_str()).collect();
                    assert_eq!(&names, expected, "input: {:?}", input);
                }
                other => panic!("expected function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn call_expression() {
        match parse_single_expression("add(1, 2 * 3, 4 + 5);") {
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                assert_eq!(function.to_string(), "add");
                let rendered: Vec<String> = arguments.iter().map(Expression::to_string).collect();
                assert_eq!(rendered, ["1", "(2 * 3)", "(4 + 5)"]);
            }
            other => panic!("expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn hash_literal() {
        match parse_single_expression("{\"one\": 1, \"two\": 1 + 1}") {
            Expression::Hash { pairs, .. } => {
                assert_eq!(pairs.len(), 2);
                assert_eq!(pairs[0].0.to_string(), "one");
                assert_eq!(pairs[0].1.to_string(), "1");
                assert_eq!(pairs[1].0.to_string(), "two");
                assert_eq!(pairs[1].1.to_string(), "(1 + 1)");
            }
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn empty_hash_literal() {
        match parse_single_expression("{}") {
            Expression::Hash { pairs, .. } => assert!(pairs.is_empty()),
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn expression_statement_semicolon_is_optional() {
        for input in &["foobar;", "foobar"] {
            let program = parse(input);
            assert_eq!(program.statements.len(), 1, "input: {:?}", input);
            assert_eq!(program.to_string(), "foobar");
        }
    }

    #[test]
    fn malformed_let_reports_error_and_parsing_continues() {
        let mut parser = Parser::new(Lexer::new("let = 5; let y = 10;"));
        let program = parser.parse_program();

        assert!(!parser.errors().is_empty());
        assert!(
            parser.errors()[0].contains("expected next token to be IDENT"),
            "unexpected message: {:?}",
            parser.errors()[0]
        );

        // The valid statement after the bad one still parses.
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Let { name, .. } => assert_eq!(name.value, "y"),
            other => panic!("expected let statement, got {:?}", other),
        }
    }

    #[test]
    fn every_syntax_error_is_reported_in_one_pass() {
        let mut parser = Parser::new(Lexer::new("let x 5; let = 10; let 838383;"));
        parser.parse_program();
        assert_eq!(parser.errors().len(), 3, "errors: {:?}", parser.errors());
    }

    #[test]
    fn missing_prefix_rule_is_reported() {
        let mut parser = Parser::new(Lexer::new("+5;"));
        parser.parse_program();
        assert!(parser
            .errors()
            .iter()
            .any(|e| e.contains("no prefix parse function for +")));
    }

    #[test]
    fn integer_literal_overflow_is_a_diagnostic() {
        let mut parser = Parser::new(Lexer::new("let x = 9999999999999999999999;"));
        parser.parse_program();
        assert!(parser
            .errors()
            .iter()
            .any(|e| e.contains("could not parse") && e.contains("as integer")));
    }

    #[test]
    fn let_statement_requires_semicolon() {
        let mut parser = Parser::new(Lexer::new("let x = 5"));
        let program = parser.parse_program();
        assert!(program.statements.is_empty());
        assert!(parser.errors().iter().any(|e| e.contains("to be ;")));
    }
}
