//! Cell value model: the closed set of things a quadrille cell can hold.
//!
//! This module provides:
//! - [`CellValue`] - the tagged union over every supported content kind
//! - [`Cell`] - one grid slot (`None` is the empty marker)
//! - [`Sym`], [`DisplayCell`], [`ObjectCell`] - identity-compared heap values
//! - [`CellAttachment`] - the renderer-resource release contract

mod color;
mod image;

pub use color::Rgba;
pub use image::{PixelSource, RasterImage};

use crate::config::Anchor;
use num_bigint::BigInt;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex};

/// One grid slot. `None` is the in-bounds empty marker; out-of-bounds is
/// expressed at the `read` level and never stored.
pub type Cell = Option<CellValue>;

/// Whether a slot holds the empty marker.
pub fn is_empty(cell: &Cell) -> bool {
    cell.is_none()
}

/// Whether a slot holds a value.
pub fn is_filled(cell: &Cell) -> bool {
    cell.is_some()
}

/// Factory closure: invoked by the fill engine with the target `(row, col)`
/// to compute the stored value at write time.
pub type FactoryFn = Arc<dyn Fn(i64, i64) -> Cell + Send + Sync>;

/// Draw closure carried by display-function and object cells. The surface is
/// an opaque handle owned by the rendering collaborator, which downcasts it.
pub type DrawFn = Box<dyn Fn(&mut DrawArgs<'_>) + Send + Sync>;

/// Arguments handed to a draw closure by the renderer.
pub struct DrawArgs<'a> {
    pub surface: &'a mut dyn Any,
    pub row: i64,
    pub col: i64,
    pub cell_length: f64,
    pub origin: Anchor,
}

/// A renderer-owned resource attached to a display or object value, e.g. an
/// off-screen framebuffer. Released through [`CellValue::release_attachment`]
/// before the owning cell is overwritten, so external graphics resources
/// never leak across destructive writes.
pub trait CellAttachment: Send {
    fn release(&mut self);
}

type AttachmentSlot = Mutex<Option<Box<dyn CellAttachment>>>;

fn take_released(slot: &AttachmentSlot) {
    if let Ok(mut guard) = slot.lock()
        && let Some(mut attachment) = guard.take()
    {
        attachment.release();
    }
}

/// A display-function cell value: a draw closure plus its attachment slot.
/// The attachment lives on the shared value, so cells sharing one display
/// function share one attachment.
pub struct DisplayCell {
    draw: DrawFn,
    attachment: AttachmentSlot,
}

impl DisplayCell {
    pub fn new(draw: impl Fn(&mut DrawArgs<'_>) + Send + Sync + 'static) -> DisplayCell {
        DisplayCell {
            draw: Box::new(draw),
            attachment: Mutex::new(None),
        }
    }

    /// Invokes the draw closure.
    pub fn draw(&self, args: &mut DrawArgs<'_>) {
        (self.draw)(args)
    }

    /// Installs a renderer resource, releasing any previous one.
    pub fn attach(&self, attachment: Box<dyn CellAttachment>) {
        take_released(&self.attachment);
        if let Ok(mut guard) = self.attachment.lock() {
            *guard = Some(attachment);
        }
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    pub fn release_attachment(&self) {
        take_released(&self.attachment);
    }
}

/// An opaque object cell value: arbitrary payload, optional display closure,
/// attachment slot. Compared by shared identity.
pub struct ObjectCell {
    data: Box<dyn Any + Send + Sync>,
    display: Option<DrawFn>,
    attachment: AttachmentSlot,
}

impl ObjectCell {
    pub fn new(data: impl Any + Send + Sync) -> ObjectCell {
        ObjectCell {
            data: Box::new(data),
            display: None,
            attachment: Mutex::new(None),
        }
    }

    /// An object that knows how to draw itself; routed through the function
    /// display hook by the rendering collaborator.
    pub fn with_display(
        data: impl Any + Send + Sync,
        draw: impl Fn(&mut DrawArgs<'_>) + Send + Sync + 'static,
    ) -> ObjectCell {
        ObjectCell {
            data: Box::new(data),
            display: Some(Box::new(draw)),
            attachment: Mutex::new(None),
        }
    }

    pub fn data(&self) -> &(dyn Any + Send + Sync) {
        self.data.as_ref()
    }

    pub fn display(&self) -> Option<&(dyn Fn(&mut DrawArgs<'_>) + Send + Sync)> {
        self.display.as_deref()
    }

    pub fn attach(&self, attachment: Box<dyn CellAttachment>) {
        take_released(&self.attachment);
        if let Ok(mut guard) = self.attachment.lock() {
            *guard = Some(attachment);
        }
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    pub fn release_attachment(&self) {
        take_released(&self.attachment);
    }
}

/// An interned symbol token. Two symbols are equal only if they are the same
/// token, regardless of description.
#[derive(Clone)]
pub struct Sym {
    inner: Arc<SymInner>,
}

struct SymInner {
    description: Option<String>,
}

impl Sym {
    pub fn new() -> Sym {
        Sym {
            inner: Arc::new(SymInner { description: None }),
        }
    }

    pub fn with_description(description: impl Into<String>) -> Sym {
        Sym {
            inner: Arc::new(SymInner {
                description: Some(description.into()),
            }),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }
}

impl Default for Sym {
    fn default() -> Self {
        Sym::new()
    }
}

impl PartialEq for Sym {
    fn eq(&self, other: &Sym) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(d) => write!(f, "Sym({})", d),
            None => write!(f, "Sym"),
        }
    }
}

/// Discriminant of a cell value, for dispatch tables and renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Number,
    BigInt,
    Text,
    Boolean,
    Symbol,
    Color,
    Image,
    Factory,
    Display,
    Array,
    Object,
}

/// The closed variant of supported cell content.
///
/// Equality follows the reference semantics: by value for numbers, bigints,
/// text, booleans and colors; by shared identity for symbols, images,
/// functions, arrays and objects.
#[derive(Clone)]
pub enum CellValue {
    Number(f64),
    BigInt(BigInt),
    Text(String),
    Boolean(bool),
    Symbol(Sym),
    Color(Rgba),
    Image(Arc<dyn PixelSource>),
    /// Lazy per-cell initializer, resolved by the fill engine.
    Factory(FactoryFn),
    /// Draw function, invoked at render time only.
    Display(Arc<DisplayCell>),
    Array(Arc<Vec<Cell>>),
    Object(Arc<ObjectCell>),
}

impl CellValue {
    pub fn kind(&self) -> Kind {
        match self {
            CellValue::Number(_) => Kind::Number,
            CellValue::BigInt(_) => Kind::BigInt,
            CellValue::Text(_) => Kind::Text,
            CellValue::Boolean(_) => Kind::Boolean,
            CellValue::Symbol(_) => Kind::Symbol,
            CellValue::Color(_) => Kind::Color,
            CellValue::Image(_) => Kind::Image,
            CellValue::Factory(_) => Kind::Factory,
            CellValue::Display(_) => Kind::Display,
            CellValue::Array(_) => Kind::Array,
            CellValue::Object(_) => Kind::Object,
        }
    }

    pub fn text(text: impl Into<String>) -> CellValue {
        CellValue::Text(text.into())
    }

    pub fn factory(f: impl Fn(i64, i64) -> Cell + Send + Sync + 'static) -> CellValue {
        CellValue::Factory(Arc::new(f))
    }

    pub fn display(draw: impl Fn(&mut DrawArgs<'_>) + Send + Sync + 'static) -> CellValue {
        CellValue::Display(Arc::new(DisplayCell::new(draw)))
    }

    pub fn image(image: impl PixelSource + 'static) -> CellValue {
        CellValue::Image(Arc::new(image))
    }

    pub fn array(items: Vec<Cell>) -> CellValue {
        CellValue::Array(Arc::new(items))
    }

    pub fn object(object: ObjectCell) -> CellValue {
        CellValue::Object(Arc::new(object))
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            CellValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Resolves this value for a destination cell: factories are invoked with
    /// the target coordinates, everything else is cloned as-is.
    pub fn resolve(&self, row: i64, col: i64) -> Cell {
        match self {
            CellValue::Factory(f) => f(row, col),
            value => Some(value.clone()),
        }
    }

    /// Releases any renderer resource held by this value. Part of the
    /// cell-overwrite contract; a no-op for value kinds without attachments.
    pub fn release_attachment(&self) {
        match self {
            CellValue::Display(d) => d.release_attachment(),
            CellValue::Object(o) => o.release_attachment(),
            _ => {}
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &CellValue) -> bool {
        use CellValue::*;
        match (self, other) {
            (Number(a), Number(b)) => a == b,
            (BigInt(a), BigInt(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (Color(a), Color(b)) => a == b,
            (Image(a), Image(b)) => Arc::ptr_eq(a, b),
            (Factory(a), Factory(b)) => Arc::ptr_eq(a, b),
            (Display(a), Display(b)) => Arc::ptr_eq(a, b),
            (Array(a), Array(b)) => Arc::ptr_eq(a, b),
            (Object(a), Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// Closures and trait objects are not Debug; spell the variants out.
impl fmt::Debug for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "Number({})", n),
            CellValue::BigInt(n) => write!(f, "BigInt({})", n),
            CellValue::Text(s) => write!(f, "Text({:?})", s),
            CellValue::Boolean(b) => write!(f, "Boolean({})", b),
            CellValue::Symbol(s) => write!(f, "Symbol({:?})", s),
            CellValue::Color(c) => write!(f, "Color({})", c),
            CellValue::Image(i) => write!(f, "Image({}x{})", i.width(), i.height()),
            CellValue::Factory(_) => write!(f, "Factory"),
            CellValue::Display(_) => write!(f, "Display"),
            CellValue::Array(items) => write!(f, "Array(len {})", items.len()),
            CellValue::Object(_) => write!(f, "Object"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> CellValue {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> CellValue {
        CellValue::Boolean(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> CellValue {
        CellValue::Text(value)
    }
}

impl From<Rgba> for CellValue {
    fn from(value: Rgba) -> CellValue {
        CellValue::Color(value)
    }
}

impl From<BigInt> for CellValue {
    fn from(value: BigInt) -> CellValue {
        CellValue::BigInt(value)
    }
}

impl From<Sym> for CellValue {
    fn from(value: Sym) -> CellValue {
        CellValue::Symbol(value)
    }
}
