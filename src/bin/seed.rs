use chrono::Utc;
use clap::Parser;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::Rng;
use sqlx::sqlite::SqlitePoolOptions;

use dailyreel::{
    auth::AuthService,
    domain::{CreateRewardRequest, CreateTopicRequest, CreateUserRequest, RewardKind},
    repository::{
        RewardRepository, SqliteRewardRepository, SqliteTopicRepository, SqliteUserRepository,
        TopicRepository, UserRepository,
    },
};

#[derive(Parser)]
#[command(about = "Seed the DailyReel database with demo data")]
struct Args {
    /// Number of demo users to create
    #[arg(long, default_value_t = 10)]
    users: usize,

    /// Database URL (falls back to DATABASE_URL, then sqlite:dailyreel.db)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:dailyreel.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let reward_repo = SqliteRewardRepository::new(db_pool.clone());
    let topic_repo = SqliteTopicRepository::new(db_pool.clone());

    // Admin with payment-management permission
    println!("👤 Creating admin...");
    let admin_hash = AuthService::hash_password("admin123").await?;
    let admin = user_repo
        .create(
            CreateUserRequest {
                name: "Admin".to_string(),
                email: "admin@dailyreel.local".to_string(),
                password: "admin123".to_string(),
            },
            admin_hash,
        )
        .await?;
    sqlx::query("UPDATE users SET role = 'admin', can_manage_payments = 1 WHERE id = ?")
        .bind(admin.id.to_string())
        .execute(&db_pool)
        .await?;
    println!("  ✅ admin@dailyreel.local / admin123");

    // Demo users with a spread of streaks
    println!("👥 Creating {} demo users...", args.users);
    let mut rng = rand::thread_rng();
    let password_hash = AuthService::hash_password("password123").await?;
    for _ in 0..args.users {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let user = user_repo
            .create(
                CreateUserRequest {
                    name,
                    email,
                    password: "password123".to_string(),
                },
                password_hash.clone(),
            )
            .await?;

        let streak: i64 = rng.gen_range(0..20);
        let total = streak + rng.gen_range(0..30);
        sqlx::query(
            r#"
            UPDATE users
            SET current_streak = ?, longest_streak = ?, total_videos = ?, last_upload_date = ?
            WHERE id = ?
            "#,
        )
        .bind(streak)
        .bind(streak + rng.gen_range(0..5))
        .bind(total)
        .bind(Utc::now().naive_utc())
        .bind(user.id.to_string())
        .execute(&db_pool)
        .await?;
    }

    // Reward catalog
    println!("🏅 Creating reward catalog...");
    let catalog = [
        ("First Steps", "Upload your first video", RewardKind::TotalVideos, 1, "🎬"),
        ("Week Warrior", "Keep a 7-day streak", RewardKind::StreakDays, 7, "🔥"),
        ("Double Digits", "Keep a 10-day streak", RewardKind::StreakDays, 10, "💪"),
        ("Habit Machine", "Upload 30 videos", RewardKind::TotalVideos, 30, "🤖"),
        ("Steady Week", "Upload on 5 days within a week", RewardKind::ConsecutiveWeeks, 1, "📅"),
    ];
    for (name, description, kind, threshold, icon) in catalog {
        reward_repo
            .create(CreateRewardRequest {
                name: name.to_string(),
                description: description.to_string(),
                kind,
                threshold,
                icon: icon.to_string(),
                points: 10,
                is_active: true,
            })
            .await?;
    }

    // Topics
    println!("📝 Creating topics...");
    let topics = [
        ("Morning routine", "Show one thing from your morning routine"),
        ("Skill practice", "Practice a skill for 60 seconds on camera"),
        ("Gratitude", "Name one thing you're grateful for today"),
    ];
    for (title, description) in topics {
        topic_repo
            .create(CreateTopicRequest {
                title: title.to_string(),
                description: description.to_string(),
            })
            .await?;
    }

    println!("✨ Seeding complete!");
    Ok(())
}
