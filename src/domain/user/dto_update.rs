use uuid::Uuid;

/// Partial profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub home_gym_id: Option<Uuid>,
}
