/// Declares a typed entry-point table for one FMI version.
///
/// Every field is an `Option` of the exact C signature. A table is either resolved from a
/// shared library (missing symbols stay `None`) or assembled by hand from Rust function
/// pointers, e.g. for statically linked FMUs.
macro_rules! entry_points {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[$meta])*
        #[allow(non_snake_case)]
        #[derive(Default, Clone)]
        pub struct $name {
            /// Keeps the shared library mapped for as long as any copy of the table exists.
            library: Option<std::sync::Arc<libloading::Library>>,
            $(
                $(#[$fmeta])*
                pub $field: Option<$ty>,
            )*
        }

        impl $name {
            /// Open the shared library at `path` and resolve every known entry point.
            ///
            /// # Safety
            /// Loading a library runs its initialisation routines, and the resolved symbols are
            /// trusted to have the signatures declared by the FMI headers.
            pub unsafe fn new<P: AsRef<std::ffi::OsStr>>(path: P) -> Result<Self, libloading::Error> {
                let library = libloading::Library::new(path)?;
                Ok(Self::from_library(library))
            }

            /// Resolve every known entry point from an already opened library.
            ///
            /// # Safety
            /// See [`Self::new`].
            pub unsafe fn from_library(library: libloading::Library) -> Self {
                Self {
                    $(
                        $field: library
                            .get::<$ty>(concat!(stringify!($field), "\0").as_bytes())
                            .ok()
                            .map(|symbol| *symbol),
                    )*
                    library: Some(std::sync::Arc::new(library)),
                }
            }

            /// Names of the entry points that could not be resolved.
            pub fn missing(&self) -> Vec<&'static str> {
                let mut missing = Vec::new();
                $(
                    if self.$field.is_none() {
                        missing.push(stringify!($field));
                    }
                )*
                missing
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("library", &self.library)
                    .field("missing", &self.missing())
                    .finish()
            }
        }
    };
}
