const MOSCOW_PLAN: &str = "```json\n{\n\"thought_process\": \"React developers in Moscow\nwith 3+ years\",\n\"search_queries\": [\"React developer Moscow\"],\n\"filters\": {\"location\": \"Москва\", \"min_experience_years\": 3, \"required_skills\": [\"React\"]},\n\"analysis_instructions\": \"Prefer commercial React experience.\",\n\"requires_refinement\": false\n}\n```";

#[tokio::test]
async fn moscow_react_query_links_cited_candidates() {
	let (service, completion) = super::in_memory_service(vec![
		Ok(MOSCOW_PLAN),
		Ok("**Analysis:**\n1, 2 - strong React experience.\nThe third candidate works with Vue."),
	]);
	let answer =
		service.process_query("React developers in Moscow, 3+ years").await.expect("Query failed.");

	assert!(answer.starts_with("**Query:** React developers in Moscow, 3+ years\n\n"));
	assert!(answer.contains("**Agent analysis:**\n**Analysis:**\n1, 2 - strong React experience."));
	assert!(answer.contains(
		"1. Frontend developer (москва, 4 years of experience)\nhttps://resumes.example.com/r-1\n"
	));
	assert!(answer.contains(
		"2. React engineer (москва, 3 years of experience)\nhttps://resumes.example.com/r-2\n"
	));
	assert!(!answer.contains("https://resumes.example.com/r-3"));
	assert!(!answer.contains("https://resumes.example.com/r-4"));
	assert!(!answer.contains("https://resumes.example.com/r-5"));

	let prompts = completion.user_prompts();

	assert_eq!(prompts.len(), 2);
	assert!(prompts[0].contains("User request: \"React developers in Moscow, 3+ years\""));
	assert!(prompts[1].contains("Prefer commercial React experience."));
	assert!(prompts[1].contains("Résumé #3:\nPosition: Vue developer\nLocation: москва\nExperience: 5 years"));
	assert!(!prompts[1].contains("Résumé #4:"));
}

#[tokio::test]
async fn unparsable_plan_falls_back_to_react_search() {
	let (service, completion) = super::in_memory_service(vec![
		Ok("Sorry, I can only answer in prose today."),
		Ok("Résumé #1 and Résumé #9 look relevant."),
	]);
	let answer = service.process_query("Someone good").await.expect("Query failed.");

	assert!(answer.contains("**Links to matching résumés:**\n1. "));
	assert_eq!(answer.matches("https://resumes.example.com/").count(), 1);
	assert_eq!(completion.calls(), 2);
}

#[tokio::test]
async fn selection_citing_nothing_recommends_new_criteria() {
	let (service, _) = super::in_memory_service(vec![
		Ok(r#"{"search_queries": ["Python ML engineer"], "filters": {"required_skills": ["python"]}}"#),
		Ok("None of these résumés match the request."),
	]);
	let answer = service.process_query("Python with ML").await.expect("Query failed.");

	assert!(answer.contains("None of these résumés match the request."));
	assert!(answer.contains("**Recommendation:** No suitable candidates were found."));
}

#[tokio::test]
async fn selection_retries_share_the_attempt_budget() {
	let (service, completion) = super::in_memory_service(vec![
		Ok(MOSCOW_PLAN),
		Err("502 Bad Gateway"),
		Ok("2 - the only strong match."),
	]);
	let answer = service.process_query("React in Moscow").await.expect("Query failed.");

	assert!(answer.contains("https://resumes.example.com/r-2"));
	assert_eq!(completion.calls(), 3);
}

#[tokio::test]
async fn malformed_plan_still_finds_the_react_candidate() {
	use std::sync::Arc;

	use scout_domain::{filter, intent::IntentOrigin};
	use scout_service::{Providers, ScoutService};
	use scout_testkit::{InMemoryStore, KeywordEmbedding, ScriptedCompletion};

	let embedding = KeywordEmbedding::new(super::VOCABULARY);
	let store = Arc::new(InMemoryStore::seeded(
		&embedding,
		vec![
			scout_testkit::profile("vue", "Vue developer", "москва", 50, "Vue, Nuxt"),
			scout_testkit::profile("react", "Frontend developer", "москва", 50, "React, Redux"),
			scout_testkit::profile("py", "Data scientist", "казань", 50, "Python, ML"),
		],
	));
	let completion = Arc::new(ScriptedCompletion::new(vec![
		Ok("{\"thought_process\": \"React devs\", \"search_queries\": [\"React\""),
		Ok("{{ not json"),
		Ok("1 - the React candidate fits."),
	]));
	let service = ScoutService::with_providers(
		scout_testkit::test_config(embedding.dim()),
		store,
		Providers::new(Arc::new(embedding), completion),
	);
	let query = "React developers in Moscow, 3+ years";
	let parsed = service.plan(query).await.expect("Planning failed.");

	assert_eq!(parsed.origin, IntentOrigin::Fallback);
	assert_eq!(
		parsed.intent.filters.required_skills,
		vec!["react".to_string(), "react.js".to_string()]
	);
	assert_eq!(parsed.intent.filters.location, None);

	let (store_filter, soft_skills) = filter::build_filters(&parsed.intent);

	assert!(store_filter.is_match_all());

	let retrieval = service
		.retrieve(&parsed.intent.search_queries, &store_filter, &soft_skills, 15)
		.await;

	assert_eq!(retrieval.strict_count, 1);
	assert_eq!(retrieval.candidates[0].id, "react");

	let answer = service.process_query(query).await.expect("Query failed.");

	assert!(answer.contains("https://resumes.example.com/react\n"));
}
