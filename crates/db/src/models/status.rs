//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Task instance lifecycle status. The only transitions in this
    /// version are Pending -> Completed (complete) and
    /// Completed -> Pending (amend).
    InstanceStatus {
        Pending = 1,
        Completed = 2,
        Skipped = 3,
    }
}

/// Completion log actions, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    Completed,
    Amended,
}

impl LogAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LogAction::Completed => "completed",
            LogAction::Amended => "amended",
        }
    }
}
