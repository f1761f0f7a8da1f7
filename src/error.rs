use crate::geometry::Point;
use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("no grid vertex at ({0})")]
    VertexNotFound(Point),
    #[error("no route for segment {segment}: ({from}) -> ({to})")]
    NoPath {
        segment: usize,
        from: Point,
        to: Point,
    },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O failure")]
    IoFailure(#[from] io::Error),
}
