use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub home_gym_id: Option<Uuid>,
}
