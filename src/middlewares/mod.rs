pub mod cors;
pub mod member;

pub use cors::create_cors;
pub use member::{DEFAULT_MEMBER, MEMBER_HEADER, MemberId, MemberMiddleware};
