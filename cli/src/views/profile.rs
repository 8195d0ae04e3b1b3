use types::auth::Profile;

use super::users::date;

pub fn profile(profile: &Profile) -> String {
    format!(
        "{} <{}>\nID:      {}\nRole:    {}\nAvatar:  {}\nJoined:  {}",
        profile.name,
        profile.email,
        profile.id,
        profile.role,
        profile.avatar,
        date(profile.creation_at),
    )
}
