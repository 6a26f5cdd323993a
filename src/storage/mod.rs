//! Bucket Store Module
//!
//! File-level access to one storage's bucket directory.
//!
//! ## Responsibilities
//! - Map bucket indices to files (`data/<index>`)
//! - Sequential scan of a bucket's records
//! - Whole-bucket rewrite through a temporary file and atomic rename
//! - Drain iteration over buckets for grow-and-rehash
//!
//! ## Directory Layout
//! ```text
//! <storage-root>/
//!   ├── parameters        (metadata record)
//!   └── data/
//!       ├── 0             (records hashed to bucket 0)
//!       ├── 3             (buckets are sparse: 1 and 2 never written)
//!       └── copy/         (scratch storage, only during growth)
//! ```

mod buckets;

pub use buckets::BucketStore;
