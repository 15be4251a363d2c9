use std::collections::BTreeMap;

use crate::token::UserId;

macro_rules! define_table {
    ($table:ident { $($(#[$meta:meta])* $field:ident : $ty:ty),* $(,)? }) => {
        paste::paste! {
            pub const [<$table:upper>]: &str = stringify!($table);

            #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
            pub struct [<$table:camel>] {
                $($(#[$meta])* pub $field: $ty,)*
            }
        }
    };
}

// Rows of the user table may carry any number of extra fields owned by other
// services. Stores that hand over whole records keep them in `attributes`;
// they never leave this crate.
define_table!(user {
    name: String,
    email: String,
    uuid: String,
    #[serde(flatten)]
    attributes: BTreeMap<String, serde_json::Value>,
});

define_table!(oauth2_token {
    token: String,
    user_id: UserId,
});
