use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error;
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use aws_smithy_types::byte_stream::error::Error as ByteStreamError;
use serde_json::Error as JsonError;
use std::error::Error as StdError;
use std::fmt;
use std::string::FromUtf8Error;

type S3ListError = SdkError<ListObjectsV2Error, Response>;
type S3GetError = SdkError<GetObjectError, Response>;
type S3PutError = SdkError<PutObjectError, Response>;
type S3CreateBucketError = SdkError<CreateBucketError, Response>;

/// Pipeline error
#[derive(Debug)]
pub enum Error {
    /// A required setting is missing or unreadable
    Config(String),
    /// S3 ListObjectsV2 operation error
    ListObjects(S3ListError),
    /// S3 GetObject operation error
    GetObject(S3GetError),
    /// S3 PutObject operation error
    PutObject(S3PutError),
    /// S3 CreateBucket operation error
    CreateBucket(S3CreateBucketError),
    /// Reading an object body failed mid-stream
    ByteStream(ByteStreamError),
    /// The object vanished between listing and fetching
    NotFound {
        /// Bucket that was read
        bucket: String,
        /// Key that no longer exists
        key: String,
    },
    /// Object body is not UTF-8 text
    Utf8(FromUtf8Error),
    /// Object body is not a valid record
    Json(JsonError),
    /// A record `date` could not be parsed
    Timestamp(String),
}

/// Coarse classification of an [`Error`], used to decide how a failure is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal before any store access
    Configuration,
    /// Listing, fetching, writing or decoding an object failed
    StoreAccess,
    /// A record or its timestamp is malformed
    Parse,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Json(_) | Error::Timestamp(_) => ErrorKind::Parse,
            Error::ListObjects(_)
            | Error::GetObject(_)
            | Error::PutObject(_)
            | Error::CreateBucket(_)
            | Error::ByteStream(_)
            | Error::NotFound { .. }
            | Error::Utf8(_) => ErrorKind::StoreAccess,
        }
    }

    /// Check if the object was missing when it was fetched
    ///
    /// Covers both the in-memory store and S3's `NoSuchKey` service error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::GetObject(e) => e
                .as_service_error()
                .map(GetObjectError::is_no_such_key)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Check if the error is a record or timestamp parse error
    pub fn is_parse_error(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    /// Check if the error came from the object store
    pub fn is_store_error(&self) -> bool {
        self.kind() == ErrorKind::StoreAccess
    }
}

macro_rules! impl_from_error {
    ($name:ident, $variant:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$variant(e)
            }
        }
    };
}

impl_from_error!(S3ListError, ListObjects);
impl_from_error!(S3GetError, GetObject);
impl_from_error!(S3PutError, PutObject);
impl_from_error!(S3CreateBucketError, CreateBucket);
impl_from_error!(ByteStreamError, ByteStream);
impl_from_error!(FromUtf8Error, Utf8);
impl_from_error!(JsonError, Json);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::ListObjects(e) => write!(f, "S3 ListObjectsV2 operation failed: {}", e),
            Error::GetObject(e) => write!(f, "S3 GetObject operation failed: {}", e),
            Error::PutObject(e) => write!(f, "S3 PutObject operation failed: {}", e),
            Error::CreateBucket(e) => write!(f, "S3 CreateBucket operation failed: {}", e),
            Error::ByteStream(e) => write!(f, "failed to read object body: {}", e),
            Error::NotFound { bucket, key } => {
                write!(f, "object `{}` not found in bucket `{}`", key, bucket)
            }
            Error::Utf8(e) => write!(f, "object body is not valid UTF-8: {}", e),
            Error::Json(e) => write!(f, "malformed record JSON: {}", e),
            Error::Timestamp(raw) => write!(f, "unparseable record date: {:?}", raw),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::ListObjects(e) => Some(e),
            Error::GetObject(e) => Some(e),
            Error::PutObject(e) => Some(e),
            Error::CreateBucket(e) => Some(e),
            Error::ByteStream(e) => Some(e),
            Error::Utf8(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Config(_) | Error::NotFound { .. } | Error::Timestamp(_) => None,
        }
    }
}
