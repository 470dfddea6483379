use std::rc::Rc;

/// Represents the contents of a statement sequence (a whole program, a method body or a block body).
///
/// Example:
/// ```text
/// "a program"
/// factorial := [:n | n = 0 ifTrue: [1] ifFalse: [n * (factorial value: n - 1)]].
/// factorial value: 5
///
/// "body within a block"
/// [ :arg |
///     local := counter + arg.
///     arg * (counter get)
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    /// The statements in the body, evaluated in order.
    pub exprs: Vec<Expression>,
}

impl Body {
    /// Construct a body from its statements.
    pub fn new(exprs: Vec<Expression>) -> Self {
        Self { exprs }
    }

    /// Is this body free of any statement ?
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

/// Represents an expression.
///
/// Example:
/// ```text
/// "reference"          counter
/// "assignment"         counter := 10
/// "messsage send"      counter incrementBy: 5
/// "literal"            'foo'
/// "block"              [ :value | counter incrementBy: value ]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A reference to a binding (eg. `counter`).
    Reference(String),
    /// An assignment to a binding (eg. `counter := 10`).
    Assignment(String, Box<Expression>),
    /// A message send, unary, binary or keyword (eg. `counter incrementBy: 5`).
    Message(Message),
    /// A literal (eg. `'foo'`, `10`, `#foo`, ...).
    Literal(Literal),
    /// A block (eg. `[ :value | counter incrementBy: value ]`).
    Block(Rc<Block>),
}

impl Expression {
    /// Build a reference to the binding `name`.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Build an assignment of `value` to the binding `name`.
    pub fn assign(name: impl Into<String>, value: Expression) -> Self {
        Self::Assignment(name.into(), Box::new(value))
    }

    /// Build a message send.
    pub fn send(receiver: Expression, signature: impl Into<String>, values: Vec<Expression>) -> Self {
        Self::Message(Message {
            receiver: Box::new(receiver),
            signature: signature.into(),
            values,
        })
    }

    /// Build an integer literal.
    pub fn integer(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    /// Build a big integer literal from its decimal digits.
    pub fn big_integer(digits: impl Into<String>) -> Self {
        Self::Literal(Literal::BigInteger(digits.into()))
    }

    /// Build a string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Build a symbol literal.
    pub fn symbol(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Symbol(value.into()))
    }

    /// Build a block literal without locals.
    pub fn block(parameters: &[&str], exprs: Vec<Expression>) -> Self {
        Self::Block(Rc::new(Block {
            parameters: parameters.iter().map(|it| it.to_string()).collect(),
            locals: Vec::new(),
            body: Body::new(exprs),
        }))
    }
}

/// Represents a message send.
///
/// Example:
/// ```text
/// "unary message send"
/// 'hello, world' size
///
/// "positional message send"
/// range from: 0 to: 10
///
/// "binary operator message send"
/// value == 3
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// The object to which the message is sent to.
    pub receiver: Box<Expression>,
    /// The signature of the message (eg. "ifTrue:ifFalse:").
    pub signature: String,
    /// The list of dynamic values that are passed.
    pub values: Vec<Expression>,
}

/// Represents a block.
///
/// Example:
/// ```text
/// "simple block"
/// [ 'hello, world' size ]
///
/// "block with parameter"
/// [ :value | value * 2 ]
///
/// "block with parameter and local"
/// [ :value | |serialized| serialized := value asString. serialized size ]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Represents the parameters' names.
    pub parameters: Vec<String>,
    /// The names of the locals.
    pub locals: Vec<String>,
    /// Represents the block's body.
    pub body: Body,
}

/// Represents a literal.
///
/// Example:
/// ```text
/// #foo     "symbol literal"
/// 'hello'  "string literal"
/// 42       "integer literal"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Represents a symbol literal (eg. `#foo`).
    Symbol(String),
    /// Represents a string literal (eg. `'hello'`).
    String(String),
    /// Represents a integer number literal (eg. `42`).
    Integer(i64),
    /// Represents a big integer (bigger than a 64-bit signed integer can represent).
    BigInteger(String),
}
