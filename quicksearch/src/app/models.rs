//! Demo entities.

use std::sync::LazyLock;

use serde::Serialize;

use crate::schema::{Entity, Field, Schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub balance: i64,
    pub latest_transactions: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub account: Option<Account>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub company_name: String,
    pub job_title: String,
}

impl User {
    pub const ID: Field<Self, i64> = Field::new("Id");
    pub const FIRST_NAME: Field<Self, String> = Field::new("FirstName");
    pub const LAST_NAME: Field<Self, String> = Field::new("LastName");
    pub const EMAIL: Field<Self, String> = Field::new("Email");
    pub const JOB_TITLE: Field<Self, String> = Field::new("JobTitle");
    /// Reads as null for a user without an account. The `i64` only fixes the
    /// kind that filter values are converted to.
    pub const ACCOUNT_BALANCE: Field<Self, i64> = Field::new("Account.Balance");

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Public projection of `User`.
///
/// `account_balance` is 0 for users without an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub account_balance: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub job_title: String,
}

impl UserDto {
    pub const ID: Field<Self, i64> = Field::new("Id");
    pub const ACCOUNT_BALANCE: Field<Self, i64> = Field::new("AccountBalance");
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            account_balance: user.account.as_ref().map_or(0, |a| a.balance),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            email: user.email.clone(),
            job_title: user.job_title.clone(),
        }
    }
}

impl Entity for Account {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<Account>> = LazyLock::new(|| {
            Schema::builder("Account")
                .property("Id", |a: &Account| a.id)
                .property("Balance", |a: &Account| a.balance)
                .property("LatestTransactions", |a: &Account| a.latest_transactions)
                .build()
        });
        &SCHEMA
    }
}

impl Entity for User {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<User>> = LazyLock::new(|| {
            Schema::builder("User")
                .property("Id", |u: &User| u.id)
                .nested("Account", |u: &User| u.account.as_ref(), Account::schema())
                .property("FirstName", |u: &User| u.first_name.clone())
                .property("LastName", |u: &User| u.last_name.clone())
                .property("FullName", User::full_name)
                .property("PhoneNumber", |u: &User| u.phone_number.clone())
                .property("Email", |u: &User| u.email.clone())
                .property("CompanyName", |u: &User| u.company_name.clone())
                .property("JobTitle", |u: &User| u.job_title.clone())
                .build()
        });
        &SCHEMA
    }
}

impl Entity for UserDto {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<UserDto>> = LazyLock::new(|| {
            Schema::builder("UserDto")
                .property("Id", |u: &UserDto| u.id)
                .property("AccountBalance", |u: &UserDto| u.account_balance)
                .property("FirstName", |u: &UserDto| u.first_name.clone())
                .property("LastName", |u: &UserDto| u.last_name.clone())
                .property("PhoneNumber", |u: &UserDto| u.phone_number.clone())
                .property("Email", |u: &UserDto| u.email.clone())
                .property("JobTitle", |u: &UserDto| u.job_title.clone())
                .build()
        });
        &SCHEMA
    }
}
