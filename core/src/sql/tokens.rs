/// SQL keywords, operators and punctuation used by the query builder.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // keywords
    SELECT,
    FROM,
    WHERE,
    AND,
    OR,
    NOT,
    AS,
    ON,
    LEFT_JOIN,
    GROUP_BY,
    HAVING,
    ORDER_BY,
    LIMIT,
    OFFSET,
    IS_NULL,
    IS_NOT_NULL,
    IN,
    LIKE,
    INSERT_INTO,
    VALUES,
    UPDATE,
    SET,
    RETURNING,
    // punctuation
    LPAREN,
    RPAREN,
    COMMA,
    DOT,
    STAR,
    // operators
    EQ,
    NE,
    LT,
    LE,
    GT,
    GE,
}

impl Token {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::NOT => "NOT",
            Token::AS => "AS",
            Token::ON => "ON",
            Token::LEFT_JOIN => "LEFT JOIN",
            Token::GROUP_BY => "GROUP BY",
            Token::HAVING => "HAVING",
            Token::ORDER_BY => "ORDER BY",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::IS_NULL => "IS NULL",
            Token::IS_NOT_NULL => "IS NOT NULL",
            Token::IN => "IN",
            Token::LIKE => "LIKE",
            Token::INSERT_INTO => "INSERT INTO",
            Token::VALUES => "VALUES",
            Token::UPDATE => "UPDATE",
            Token::SET => "SET",
            Token::RETURNING => "RETURNING",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::DOT => ".",
            Token::STAR => "*",
            Token::EQ => "=",
            Token::NE => "<>",
            Token::LT => "<",
            Token::LE => "<=",
            Token::GT => ">",
            Token::GE => ">=",
        }
    }

    /// Comparison operators, rendered with surrounding spaces
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::EQ | Token::NE | Token::LT | Token::LE | Token::GT | Token::GE
        )
    }
}
