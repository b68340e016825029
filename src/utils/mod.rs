pub mod time;

const ID_LEN: usize = 21;

/// Generate a unique identifier for records, events and logs.
pub fn longid() -> String {
    nanoid::nanoid!(ID_LEN)
}

/// Generate a short identifier for nodes and edges created in the editor.
pub fn shortid() -> String {
    nanoid::nanoid!(8)
}
