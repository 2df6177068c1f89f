pub mod pxlog;
