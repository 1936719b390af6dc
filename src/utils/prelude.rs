pub(in crate)
use {
    ::core::{
        marker::PhantomData,
        time::Duration,
    },
    ::std::{
        sync::{
            Arc,
            Condvar,
            Mutex,
        },
    },
    ::log::{
        debug,
        trace,
        warn,
    },
    crate::{
        config::Config,
        error::{
            Cancelled,
            GeneratorError,
        },
        producer::Producer,
        runner::{
            RunState,
            Yielder,
        },
        utils::lock,
    },
};
