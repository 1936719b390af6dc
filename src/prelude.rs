//! The crate prelude: reexport the most essential utilities so that blob
//! `use`-ing them should enable the most straight-forward usage.

pub use {
    crate::{
        from_fn,
        make_yield,
        Cursor,
        Generator,
        GeneratorError,
        Producer,
        RunState,
        Yielder,
    },
};

#[cfg(feature = "macros")]
pub use {
    ::thread_gen_proc_macros::{
        generator,
    },
};
