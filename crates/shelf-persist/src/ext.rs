use shelf_codec::Record;
use shelf_context::{ReadContext, WriteContext};

use crate::error::PersistResult;
use crate::op::{ReadOp, WriteOp};
use crate::read::Read;
use crate::remove::Remove;
use crate::write::Write;

/// Method-call sugar over [`Write`], [`Remove`] and [`Read`].
///
/// ```ignore
/// let saved = person.write_on(&ctx)?;
/// saved.remove_on(&ctx)?;
/// ```
pub trait PersistExt: Record {
    fn write_op(self) -> WriteOp<Self> {
        Write::item(self)
    }

    fn remove_op(&self) -> WriteOp<()> {
        Remove::item(self)
    }

    fn write_on<C: WriteContext>(self, ctx: &C) -> PersistResult<Self> {
        self.write_op().run(ctx)
    }

    fn remove_on<C: WriteContext>(&self, ctx: &C) -> PersistResult<()> {
        self.remove_op().run(ctx)
    }

    /// Re-read the stored version of this value.
    fn reload_from<C: ReadContext>(&self, ctx: &C) -> PersistResult<Option<Self>> {
        let op: ReadOp<Option<Self>> = Read::<Self>::at_index(self.index());
        op.run(ctx)
    }
}

impl<T: Record> PersistExt for T {}
