pub(crate) mod arena;
pub(crate) mod ast;
pub(crate) mod binary;
pub(crate) mod buckets;
pub(crate) mod classifier;
pub(crate) mod image_list;
pub(crate) mod interp;
pub(crate) mod legend;
pub(crate) mod lexer;
pub(crate) mod linear;
pub(crate) mod lower;
pub(crate) mod palette;
pub(crate) mod parser;
pub(crate) mod property;
pub(crate) mod ramp;
pub(crate) mod shader;
pub(crate) mod top;
pub(crate) mod unary;
pub(crate) mod value;
