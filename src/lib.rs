#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use pdm_reflect as reflect;
pub use pdm_utils as utils;
