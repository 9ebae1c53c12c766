use crate::common::*;
use crate::parse::ast;

/// A consumer of an expression tree.
///
/// The compiler and the tracer are both visitors over the same immutable
/// tree, so each lowers every node kind independently.
pub trait AstVisitor {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<Self>,
    {
        node.accept(self)
    }

    fn visit_constant(&mut self, x: Int) -> Self::Output;

    fn visit_dice(&mut self, dice: &ast::DiceTerm) -> Self::Output;

    fn visit_binary(&mut self, bin: &ast::BinaryOp) -> Self::Output;

    fn visit_group(&mut self, inner: &ast::Node) -> Self::Output {
        inner.accept(self)
    }
}

pub trait Accept<V: AstVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: AstVisitor + ?Sized> Accept<V> for ast::Node {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Constant(x) => v.visit_constant(*x),
            Self::Dice(x) => v.visit_dice(x),
            Self::Binary(x) => v.visit_binary(x),
            Self::Group(x) => v.visit_group(x),
        }
    }
}
