//! Uniform closing of file sinks and other explicitly-closed resources.
//!
//! Most handles in this crate release themselves on drop. The ones that can
//! fail while releasing (buffered writers that still need a flush, files that
//! must reach the disk) implement [`Close`] so the failure is observed instead
//! of being swallowed by `Drop`.

use crate::error::{DbError, DbResult};
use std::io::Write;

/// A resource whose release can fail.
pub trait Close {
    fn close(&mut self) -> DbResult<()>;
}

impl Close for std::fs::File {
    fn close(&mut self) -> DbResult<()> {
        self.sync_all()?;
        Ok(())
    }
}

impl<W: Write> Close for std::io::BufWriter<W> {
    fn close(&mut self) -> DbResult<()> {
        self.flush()?;
        Ok(())
    }
}

impl<T: Close + ?Sized> Close for Box<T> {
    fn close(&mut self) -> DbResult<()> {
        (**self).close()
    }
}

impl<T: Close + ?Sized> Close for &mut T {
    fn close(&mut self) -> DbResult<()> {
        (**self).close()
    }
}

/// Close every present resource in order.
///
/// `None` entries are skipped. A failure is logged and the remaining resources
/// are still closed; the first failure is returned.
pub fn close_all<'a, I>(resources: I) -> Option<DbError>
where
    I: IntoIterator<Item = Option<&'a mut dyn Close>>,
{
    let mut first_error = None;

    for (index, resource) in resources.into_iter().enumerate() {
        let Some(resource) = resource else {
            continue;
        };
        if let Err(err) = resource.close() {
            tracing::error!(index, error = %err, "failed to close resource");
            first_error.get_or_insert(err);
        }
    }

    first_error
}

/// Close a variadic list of `Option<&mut dyn Close>`-convertible resources.
///
/// Each argument is an expression of type `Option<&mut T>` where `T: Close`.
///
/// ```ignore
/// let mut out = std::io::BufWriter::new(std::fs::File::create("copy.txt")?);
/// if let Some(err) = empdb::close!(Some(&mut out)) {
///     eprintln!("close failed: {err}");
/// }
/// ```
#[macro_export]
macro_rules! close {
    ($($resource:expr),* $(,)?) => {
        $crate::closer::close_all([
            $( ($resource).map(|r| r as &mut dyn $crate::closer::Close) ),*
        ])
    };
}
