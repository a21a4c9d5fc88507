use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

pub fn market_insights() -> Value {
    json!({
        "timestamp": Utc::now().to_rfc3339(),
        "market_overview": {
            "trending_fields": [
                {
                    "field": "Artificial Intelligence & Machine Learning",
                    "growth_rate": "25%",
                    "job_openings": 15000,
                    "avg_salary": "₹8-20 LPA",
                    "hot_skills": ["Python", "TensorFlow", "Deep Learning", "NLP"],
                    "companies_hiring": ["Google", "Microsoft", "Amazon", "Flipkart"]
                },
                {
                    "field": "Cybersecurity",
                    "growth_rate": "18%",
                    "job_openings": 8000,
                    "avg_salary": "₹6-15 LPA",
                    "hot_skills": ["Ethical Hacking", "Network Security", "CISSP", "Penetration Testing"],
                    "companies_hiring": ["IBM", "Cisco", "Deloitte", "EY"]
                },
                {
                    "field": "Cloud Computing",
                    "growth_rate": "22%",
                    "job_openings": 12000,
                    "avg_salary": "₹7-18 LPA",
                    "hot_skills": ["AWS", "Azure", "Kubernetes", "Docker"],
                    "companies_hiring": ["AWS", "Microsoft", "TCS", "Accenture"]
                }
            ],
            "industry_demand": {
                "Information Technology": { "demand": "Very High", "growth": "20%" },
                "Healthcare": { "demand": "High", "growth": "15%" },
                "Finance": { "demand": "High", "growth": "12%" },
                "E-commerce": { "demand": "Very High", "growth": "25%" },
                "Education Technology": { "demand": "High", "growth": "18%" }
            },
            "skill_demand": {
                "Programming Languages": { "demand_score": 95, "trending": ["Python", "JavaScript", "Go"] },
                "Data Science": { "demand_score": 88, "trending": ["Machine Learning", "Big Data", "Analytics"] },
                "Cloud Technologies": { "demand_score": 92, "trending": ["AWS", "Kubernetes", "Serverless"] },
                "Mobile Development": { "demand_score": 82, "trending": ["Flutter", "React Native", "Swift"] }
            }
        },
        "regional_insights": {
            "Bangalore": {
                "top_industries": ["IT Services", "Startups", "R&D"],
                "avg_salary_multiplier": 1.2,
                "job_availability": "Very High"
            },
            "Hyderabad": {
                "top_industries": ["IT Services", "Pharma", "Aerospace"],
                "avg_salary_multiplier": 1.1,
                "job_availability": "High"
            },
            "Pune": {
                "top_industries": ["IT Services", "Automotive", "Manufacturing"],
                "avg_salary_multiplier": 1.0,
                "job_availability": "High"
            }
        },
        "salary_insights": {
            "Entry Level (0-2 years)": "₹3-8 LPA",
            "Mid Level (3-6 years)": "₹8-18 LPA",
            "Senior Level (7-12 years)": "₹18-35 LPA",
            "Leadership (12+ years)": "₹35-80 LPA"
        },
        "future_outlook": {
            "emerging_technologies": [
                "Quantum Computing",
                "Web3 & Blockchain",
                "Augmented Reality",
                "IoT & Edge Computing",
                "Green Technology"
            ],
            "skill_predictions": [
                "AI/ML skills will be essential across all tech roles",
                "Cloud-native development becoming standard",
                "Cybersecurity skills in high demand",
                "Data literacy required for most positions"
            ]
        }
    })
}

pub fn comprehensive_recommendations(user_id: Option<&str>) -> Value {
    json!({
        "user_id": user_id.unwrap_or("demo_user"),
        "timestamp": Utc::now().to_rfc3339(),
        "ai_guidance": {
            "confidence_score": 0.85,
            "consolidated_recommendations": {
                "career_paths": [
                    {
                        "title": "Software Development",
                        "description": "High-growth field with excellent prospects",
                        "confidence": 0.92,
                        "next_steps": ["Learn programming", "Build portfolio", "Practice coding"]
                    },
                    {
                        "title": "Data Science",
                        "description": "Emerging field with high demand",
                        "confidence": 0.87,
                        "next_steps": ["Study statistics", "Learn Python/R", "Work on projects"]
                    }
                ]
            }
        },
        "market_insights": {
            "Software Development": {
                "market_data": {
                    "growth_rate": "15%",
                    "average_salary": "₹6-12 LPA",
                    "job_openings": 25000,
                    "required_skills": ["JavaScript", "Python", "React", "Node.js"],
                    "top_companies": ["TCS", "Infosys", "Amazon", "Google"]
                }
            }
        },
        "personalization_score": 0.85,
        "recommendations_count": 2,
        "data_sources": ["ai_agents", "market_data", "database"]
    })
}

pub fn skills_analysis(user_id: Option<&str>) -> Value {
    json!({
        "analysis_id": format!("analysis_{}", Uuid::new_v4()),
        "user_id": user_id.unwrap_or("demo_user"),
        "timestamp": Utc::now().to_rfc3339(),
        "skill_assessment": {
            "current_skills": [
                { "name": "Programming", "level": 7, "category": "Technical" },
                { "name": "Problem Solving", "level": 8, "category": "Analytical" },
                { "name": "Communication", "level": 6, "category": "Soft Skills" },
                { "name": "Leadership", "level": 5, "category": "Management" }
            ],
            "skill_gaps": [
                {
                    "skill_name": "Advanced Data Structures",
                    "importance": "High",
                    "current_level": 4,
                    "target_level": 8,
                    "gap_score": 4,
                    "learning_path": ["Online Courses", "Practice Problems", "Projects"]
                },
                {
                    "skill_name": "Cloud Computing",
                    "importance": "Medium",
                    "current_level": 2,
                    "target_level": 7,
                    "gap_score": 5,
                    "learning_path": ["AWS Certification", "Hands-on Practice"]
                }
            ],
            "recommendations": [
                "Focus on strengthening data structures and algorithms",
                "Consider cloud computing certification",
                "Practice system design concepts"
            ],
            "confidence_score": 0.82
        },
        "career_alignment": {
            "compatibility_scores": {
                "Software Engineer": 0.85,
                "Data Scientist": 0.78,
                "Product Manager": 0.65,
                "DevOps Engineer": 0.72
            },
            "top_career_match": "Software Engineer"
        }
    })
}

/// Upstream-shaped course recommendations. Goes through the same
/// transformation as a live response.
pub fn course_recommendations(max_recommendations: u64) -> Value {
    let catalog = [
        json!({
            "title": "Python for Everybody",
            "provider": "Coursera",
            "description": "Programming fundamentals with Python, from variables to web data.",
            "duration": "8 weeks",
            "difficulty_level": "Beginner",
            "match_percentage": 92,
            "reasoning": "Builds the programming base most technology careers expect.",
            "skills_gained": ["Python", "Data Structures", "Web Scraping"],
            "prerequisites": [],
            "estimated_cost": "Free to audit",
            "rating": 4.8,
            "enrollments": 2_800_000,
            "url": "https://www.coursera.org/specializations/python"
        }),
        json!({
            "title": "Machine Learning Specialization",
            "provider": "Coursera",
            "description": "Supervised and unsupervised learning with practical projects.",
            "duration": "3 months",
            "difficulty_level": "Intermediate",
            "match_percentage": 87,
            "reasoning": "Matches strong demand for AI/ML skills across tech roles.",
            "skills_gained": ["Regression", "Classification", "Neural Networks"],
            "prerequisites": ["Python", "Basic linear algebra"],
            "estimated_cost": "₹4,000 per month",
            "rating": 4.9,
            "enrollments": 1_200_000,
            "url": "https://www.coursera.org/specializations/machine-learning-introduction"
        }),
        json!({
            "title": "AWS Cloud Practitioner Essentials",
            "provider": "AWS Skill Builder",
            "description": "Core cloud concepts, AWS services, security and pricing.",
            "duration": "6 hours",
            "difficulty_level": "Beginner",
            "match_percentage": 81,
            "reasoning": "Cloud skills are becoming standard for new developers.",
            "skills_gained": ["Cloud Computing", "AWS"],
            "estimated_cost": "Free",
            "rating": 4.6,
            "enrollments": 500_000,
            "url": "https://explore.skillbuilder.aws/"
        }),
    ];

    let recommendations: Vec<Value> = catalog
        .into_iter()
        .take(usize::try_from(max_recommendations).unwrap_or(usize::MAX))
        .collect();

    json!({
        "success": true,
        "total_found": recommendations.len(),
        "processing_time": 0,
        "generated_at": Utc::now().to_rfc3339(),
        "recommendations": recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_insights_sections_present() {
        let body = market_insights();
        for key in [
            "market_overview",
            "regional_insights",
            "salary_insights",
            "future_outlook",
        ] {
            assert!(body.get(key).is_some(), "missing {key}");
        }
        assert_eq!(
            body["market_overview"]["trending_fields"]
                .as_array()
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn test_user_id_defaults_to_demo_user() {
        assert_eq!(comprehensive_recommendations(None)["user_id"], "demo_user");
        assert_eq!(skills_analysis(Some("u1"))["user_id"], "u1");
        assert_eq!(
            skills_analysis(None)["career_alignment"]["top_career_match"],
            "Software Engineer"
        );
    }

    #[test]
    fn test_course_recommendations_respect_max() {
        let body = course_recommendations(2);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
        assert_eq!(body["total_found"], 2);

        let body = course_recommendations(10);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
    }
}
