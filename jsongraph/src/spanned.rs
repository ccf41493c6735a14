use chumsky::span::SimpleSpan;

/// A value together with the region of the input it was parsed from.
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub span: SimpleSpan<usize>,
    pub val: T,
}
