use cfg_if::cfg_if;

pub(crate) mod soft;

cfg_if! {
    if #[cfg(not(chacha_wide_force_soft))] {
        pub(crate) mod wide;
    }
}
