macro_rules! use_prelude {() => (
    use crate::utils::prelude::*;
)}
