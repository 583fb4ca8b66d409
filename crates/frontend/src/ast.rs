use std::rc::Rc;

use num_bigint::BigInt;

// Every node keeps the exact slice of source it was parsed from. Runtime
// errors quote it back to the user.
#[derive(Debug, PartialEq, Clone)]
pub struct ASTNode {
    pub node: ASTNodeKind,
    pub text: String,
    pub line: u64,
}

impl ASTNode {
    pub fn new(node: ASTNodeKind, text: impl Into<String>, line: u64) -> Self {
        Self {
            node,
            text: text.into(),
            line,
        }
    }
}

// Sequence of statements. It is the root of a program and the body of
// functions, branches and loops.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Block {
    pub statements: Vec<ASTNode>,
}

impl Block {
    pub fn new(statements: Vec<ASTNode>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ASTNodeKind {
    Block(Block),
    Funcall {
        name: String,
        args: Vec<ASTNode>,
    },
    // '+' or '-' in front of an expression
    UnaryOp {
        operator: String,
        operand: Box<ASTNode>,
    },
    Not {
        operand: Box<ASTNode>,
    },
    And {
        left: Box<ASTNode>,
        right: Box<ASTNode>,
    },
    Or {
        left: Box<ASTNode>,
        right: Box<ASTNode>,
    },
    // Arithmetic and comparisons. The operator is kept as written so an
    // unknown one can still be reported by the evaluator.
    BinaryOp {
        left: Box<ASTNode>,
        right: Box<ASTNode>,
        operator: String,
    },
    Var {
        symbol: String,
    },
    IntLiteral {
        value: BigInt,
    },
    ParenExpr {
        inner: Box<ASTNode>,
    },
    Assignment {
        name: String,
        value: Box<ASTNode>,
    },
    IfElse {
        cond: Box<ASTNode>,
        true_branch: Block,
        false_branch: Option<Block>,
    },
    While {
        cond: Box<ASTNode>,
        body: Block,
    },
    // The body is shared with the function registry, which outlives the tree
    // of the program that declared it.
    FunDef {
        name: String,
        params: Vec<String>,
        body: Rc<Block>,
    },
}

impl ASTNodeKind {
    // Name of the node kind, for evaluation traces
    pub fn kind_name(&self) -> &'static str {
        match self {
            ASTNodeKind::Block(_) => "Block",
            ASTNodeKind::Funcall { .. } => "Funcall",
            ASTNodeKind::UnaryOp { .. } => "UnaryOp",
            ASTNodeKind::Not { .. } => "Not",
            ASTNodeKind::And { .. } => "And",
            ASTNodeKind::Or { .. } => "Or",
            ASTNodeKind::BinaryOp { .. } => "BinaryOp",
            ASTNodeKind::Var { .. } => "Var",
            ASTNodeKind::IntLiteral { .. } => "IntLiteral",
            ASTNodeKind::ParenExpr { .. } => "ParenExpr",
            ASTNodeKind::Assignment { .. } => "Assignment",
            ASTNodeKind::IfElse { .. } => "IfElse",
            ASTNodeKind::While { .. } => "While",
            ASTNodeKind::FunDef { .. } => "FunDef",
        }
    }
}
