use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// User models

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Donor,
    Recipient,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Donor => write!(f, "donor"),
            Self::Recipient => write!(f, "recipient"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Self::Donor),
            "recipient" => Ok(Self::Recipient),
            other => Err(format!("Unknown user role: {}", other)),
        }
    }
}

impl User {
    pub fn is_donor(&self) -> bool {
        self.role == "donor"
    }

    pub fn is_recipient(&self) -> bool {
        self.role == "recipient"
    }
}

/// Public projection of a user, safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

// Donation models

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Available,
    Claimed,
    Completed,
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Claimed => write!(f, "claimed"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for DonationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "claimed" => Ok(Self::Claimed),
            "completed" => Ok(Self::Completed),
            other => Err(format!("Unknown donation status: {}", other)),
        }
    }
}

/// A food listing. `donor_name` is copied from the owning user at creation
/// time and intentionally goes stale if the user record later changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub food_type: String,
    pub quantity: String,
    pub expiry_date: String,
    pub location: String,
    pub contact_info: String,
    pub donor_id: String,
    pub donor_name: String,
    pub status: String,
    pub created_at: String,
}

impl Donation {
    pub fn status_enum(&self) -> Result<DonationStatus, String> {
        self.status.parse()
    }
}

// Request models

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("Unknown request status: {}", other)),
        }
    }
}

/// A recipient's claim against a donation. The donation title and recipient
/// contact fields are copy-on-create snapshots, same policy as `donor_name`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    pub id: String,
    pub donation_id: String,
    pub donation_title: String,
    pub recipient_id: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub recipient_phone: String,
    pub reason: String,
    pub status: String,
    pub donor_response: Option<String>,
    pub created_at: String,
}

// DTOs for API

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    pub title: String,
    pub description: String,
    pub food_type: String,
    pub quantity: String,
    pub expiry_date: String,
    pub location: String,
    pub contact_info: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDonationRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequestRequest {
    pub donation_id: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondToRequestRequest {
    pub status: String,
    #[serde(default)]
    pub donor_response: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donation_status_round_trip() {
        for status in [
            DonationStatus::Available,
            DonationStatus::Claimed,
            DonationStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<DonationStatus>(), Ok(status));
        }
        assert!("deleted".parse::<DonationStatus>().is_err());
    }

    #[test]
    fn test_request_status_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<RequestStatus>(), Ok(status));
        }
        assert!("cancelled".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!("donor".parse::<UserRole>(), Ok(UserRole::Donor));
        assert_eq!("recipient".parse::<UserRole>(), Ok(UserRole::Recipient));
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: "u1".to_string(),
            name: "Ama".to_string(),
            email: "ama@example.com".to_string(),
            password_hash: "secret".to_string(),
            phone: "123".to_string(),
            address: "Accra".to_string(),
            role: "donor".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
    }

    fn bread_donation(status: &str) -> Donation {
        Donation {
            id: "d1".to_string(),
            title: "Bread".to_string(),
            description: "5 loaves".to_string(),
            food_type: "baked".to_string(),
            quantity: "5".to_string(),
            expiry_date: "2026-09-01".to_string(),
            location: "Downtown".to_string(),
            contact_info: "555-0100".to_string(),
            donor_id: "u1".to_string(),
            donor_name: "Ama".to_string(),
            status: status.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_donation_status_accessor() {
        assert_eq!(
            bread_donation("available").status_enum(),
            Ok(DonationStatus::Available)
        );
        assert_eq!(
            bread_donation("claimed").status_enum(),
            Ok(DonationStatus::Claimed)
        );
        assert!(bread_donation("eaten").status_enum().is_err());
    }

    #[test]
    fn test_donation_serializes_camel_case() {
        let donation = bread_donation("available");
        let json = serde_json::to_string(&donation).unwrap();
        assert!(json.contains("foodType"));
        assert!(json.contains("donorName"));
        assert!(!json.contains("food_type"));
    }
}
